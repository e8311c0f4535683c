use std::collections::BTreeMap;

use proptest::prelude::*;

use skm::groups::group_of;
use skm::links::LinkStatus;
use skm::reconcile::{plan, PlanAction, Selection};

fn skill_name() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,2}"
}

fn link_status() -> impl Strategy<Value = LinkStatus> {
    prop_oneof![
        Just(LinkStatus::Absent),
        Just(LinkStatus::ManagedLinked),
        Just(LinkStatus::Foreign),
    ]
}

fn state_and_selection()
-> impl Strategy<Value = (BTreeMap<String, LinkStatus>, Selection)> {
    proptest::collection::btree_map(skill_name(), (link_status(), any::<bool>()), 0..30).prop_map(
        |map| {
            let mut state = BTreeMap::new();
            let mut selection = Selection::new();
            for (name, (status, desired)) in map {
                state.insert(name.clone(), status);
                selection.set(name, desired);
            }
            (state, selection)
        },
    )
}

proptest! {
    /// No plan ever creates or removes under a Foreign name.
    #[test]
    fn test_plan_never_targets_foreign((state, selection) in state_and_selection()) {
        for item in plan(&state, &selection) {
            if state.get(&item.skill) == Some(&LinkStatus::Foreign) {
                prop_assert!(matches!(
                    item.action,
                    PlanAction::SkipConflict | PlanAction::NoOp
                ));
            }
        }
    }

    /// Planning is deterministic and covers every named skill exactly once.
    #[test]
    fn test_plan_deterministic_and_total((state, selection) in state_and_selection()) {
        let first = plan(&state, &selection);
        let second = plan(&state, &selection);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), state.len());

        let unique: std::collections::BTreeSet<&String> =
            first.iter().map(|i| &i.skill).collect();
        prop_assert_eq!(unique.len(), first.len());
    }

    /// Plan order is group-then-name ascending.
    #[test]
    fn test_plan_ordering((state, selection) in state_and_selection()) {
        let items = plan(&state, &selection);
        let keys: Vec<_> = items
            .iter()
            .map(|i| (group_of(&i.skill), i.skill.clone()))
            .collect();
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Simulated apply: executing the planned transitions and re-planning
    /// yields no further work (idempotence at the state level).
    #[test]
    fn test_replan_after_transitions_is_noop((state, selection) in state_and_selection()) {
        let mut next = state.clone();
        for item in plan(&state, &selection) {
            match item.action {
                PlanAction::CreateLink => {
                    next.insert(item.skill, LinkStatus::ManagedLinked);
                }
                PlanAction::RemoveLink => {
                    next.insert(item.skill, LinkStatus::Absent);
                }
                PlanAction::SkipConflict | PlanAction::NoOp => {}
            }
        }
        for item in plan(&next, &selection) {
            prop_assert!(matches!(
                item.action,
                PlanAction::NoOp | PlanAction::SkipConflict
            ));
        }
    }
}
