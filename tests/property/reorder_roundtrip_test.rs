//! Property tests for the reorder operation: any permutation the client
//! sends comes back verbatim from the next list, and applying it again
//! changes nothing.

use proptest::prelude::*;

use newtab::database::Database;
use newtab::managers::link_manager::{LinkManager, LinkManagerTrait};
use newtab::types::link::NewLink;

fn create_links(mgr: &mut LinkManager, owner: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            mgr.create(NewLink {
                owner_id: Some(owner.to_string()),
                href: Some(format!("https://site{}.example.com", i)),
                label: format!("link {}", i),
                icon: "i".to_string(),
                ..Default::default()
            })
            .unwrap()
            .id
        })
        .collect()
}

fn listed_ids(mgr: &LinkManager, owner: &str) -> Vec<String> {
    mgr.list(Some(owner))
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_reorder_round_trips_any_permutation(
        count in 1usize..8,
        seed in any::<u64>(),
    ) {
        let db = Database::open_in_memory().unwrap();
        let mut mgr = LinkManager::new(db.connection());
        let mut ids = create_links(&mut mgr, "u1", count);

        // Deterministic shuffle from the seed.
        let mut state = seed;
        for i in (1..ids.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            ids.swap(i, j);
        }

        mgr.reorder(Some("u1"), &ids).unwrap();
        prop_assert_eq!(listed_ids(&mgr, "u1"), ids.clone());

        // Idempotent: a second identical batch changes nothing.
        mgr.reorder(Some("u1"), &ids).unwrap();
        prop_assert_eq!(listed_ids(&mgr, "u1"), ids);
    }

    #[test]
    fn prop_reorder_never_leaks_across_owners(
        count in 1usize..5,
        other_count in 1usize..5,
    ) {
        let db = Database::open_in_memory().unwrap();
        let mut mgr = LinkManager::new(db.connection());
        let mut mine = create_links(&mut mgr, "u1", count);
        let others = create_links(&mut mgr, "u2", other_count);

        mine.reverse();
        let mut batch = mine.clone();
        batch.extend(others.clone());

        mgr.reorder(Some("u1"), &batch).unwrap();

        prop_assert_eq!(listed_ids(&mgr, "u1"), mine);
        // The other owner's links keep their original insertion order.
        prop_assert_eq!(listed_ids(&mgr, "u2"), others);
    }

    #[test]
    fn prop_positions_stay_contiguous_after_reorder(count in 1usize..8) {
        let db = Database::open_in_memory().unwrap();
        let mut mgr = LinkManager::new(db.connection());
        let mut ids = create_links(&mut mgr, "u1", count);
        ids.rotate_left(count / 2);

        mgr.reorder(Some("u1"), &ids).unwrap();

        let positions: Vec<i32> = mgr
            .list(Some("u1"))
            .unwrap()
            .into_iter()
            .map(|l| l.position)
            .collect();
        let expected: Vec<i32> = (0..count as i32).collect();
        prop_assert_eq!(positions, expected);
    }
}
