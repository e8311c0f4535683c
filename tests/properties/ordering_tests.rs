use proptest::prelude::*;

use skm::groups::{group_members, group_of, Group};

fn skill_name() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,2}"
}

proptest! {
    /// Groups ascend with Unclassified last; names ascend within each
    /// group, for any input order.
    #[test]
    fn test_group_members_sorted(names in proptest::collection::vec(skill_name(), 0..40)) {
        let members = group_members(names.clone());

        let groups: Vec<&Group> = members.keys().collect();
        prop_assert!(groups.windows(2).all(|w| w[0] < w[1]));

        for names_in_group in members.values() {
            prop_assert!(names_in_group.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Partitioning is total and consistent with the classifier.
    #[test]
    fn test_group_members_partition(names in proptest::collection::vec(skill_name(), 0..40)) {
        let members = group_members(names.clone());
        for name in &names {
            let group = group_of(name);
            prop_assert!(members[&group].contains(name));
        }
    }

    /// Input order never changes the result.
    #[test]
    fn test_group_members_order_independent(mut names in proptest::collection::vec(skill_name(), 0..40)) {
        let forward = group_members(names.clone());
        names.reverse();
        prop_assert_eq!(forward, group_members(names));
    }
}
