use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::error::Result;

/// Robot-mode response envelope: every command emits exactly one of
/// these on stdout when `--robot` is set.
#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Partial { completed: usize, failed: usize },
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn robot_partial<T: Serialize>(data: T, completed: usize, failed: usize) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Partial { completed, failed },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn emit_robot<T: Serialize>(response: &RobotResponse<T>) -> Result<()> {
    println!("{}", serde_json::to_string(response)?);
    Ok(())
}

/// Section header for human output.
pub fn heading(text: &str) {
    println!("{}", style(text).bold().magenta());
}

pub fn success(text: &str) {
    println!("{} {text}", style("✓").green());
}

pub fn warning(text: &str) {
    println!("{} {text}", style("!").yellow());
}

pub fn failure(text: &str) {
    println!("{} {text}", style("✗").red());
}

pub fn dimmed(text: &str) -> String {
    style(text).dim().to_string()
}
