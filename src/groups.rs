//! Grouping classifier.
//!
//! Skill names partition into presentation groups derived from the name
//! alone: the prefix before the first `-` is the group. Names with no
//! usable prefix fall into [`Group::Unclassified`], which orders after
//! every named group so "other" items always render last. The
//! classification is pure and does no I/O.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A derived, non-persisted group of skill names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Group {
    Named(String),
    Unclassified,
}

impl Group {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Unclassified => "other",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Ord for Group {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a.cmp(b),
            (Self::Named(_), Self::Unclassified) => Ordering::Less,
            (Self::Unclassified, Self::Named(_)) => Ordering::Greater,
            (Self::Unclassified, Self::Unclassified) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Group {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classify one skill name. Splits on the first `-`; an empty prefix
/// (leading separator) is degenerate and lands in `Unclassified`.
#[must_use]
pub fn group_of(name: &str) -> Group {
    match name.split_once('-') {
        Some((prefix, _)) if !prefix.is_empty() => Group::Named(prefix.to_string()),
        _ => Group::Unclassified,
    }
}

/// Partition names into groups, sorted and deduplicated: groups ascend
/// lexicographically with `Unclassified` last, names ascend within each
/// group. Stable for any input order.
pub fn group_members<I, S>(names: I) -> BTreeMap<Group, Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut members: BTreeMap<Group, Vec<String>> = BTreeMap::new();
    for name in names {
        let name = name.into();
        members.entry(group_of(&name)).or_default().push(name);
    }
    for names in members.values_mut() {
        names.sort();
        names.dedup();
    }
    members
}
