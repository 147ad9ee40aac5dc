//! Property-based tests for toggle sets
//!
//! Tests invariants:
//! - toggling a row twice restores its membership
//! - rank and category selections stay sorted and duplicate free
//! - out of range ranks and categories are ignored

use proptest::prelude::*;

use crate::core::expansion::ExpansionTracker;
use crate::core::jobs::{ScrapeSintaRequest, SINTA_RANKS};

proptest! {
    #[test]
    fn expansion_double_toggle_restores(
        seed in prop::collection::vec(0usize..50, 0..20),
        index in 0usize..50,
    ) {
        let mut tracker = ExpansionTracker::new();
        for i in &seed {
            tracker.toggle(*i);
        }
        let before = tracker.is_expanded(index);
        tracker.toggle(index);
        prop_assert_eq!(tracker.is_expanded(index), !before);
        tracker.toggle(index);
        prop_assert_eq!(tracker.is_expanded(index), before);
    }

    #[test]
    fn rank_toggles_behave_as_set(toggles in prop::collection::vec(0u8..8, 0..30)) {
        let mut request = ScrapeSintaRequest::default();
        let mut model = request.sinta_ranks.clone();
        for rank in toggles {
            request.toggle_rank(rank);
            if SINTA_RANKS.contains(&rank) && !model.remove(&rank) {
                model.insert(rank);
            }
        }
        prop_assert_eq!(&request.sinta_ranks, &model);

        let serialized: Vec<u8> = request.sinta_ranks.iter().copied().collect();
        let mut sorted = serialized.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(serialized, sorted);
    }

    #[test]
    fn rank_double_toggle_restores(rank in 1u8..=5) {
        let mut request = ScrapeSintaRequest::default();
        let before = request.sinta_ranks.clone();
        request.toggle_rank(rank);
        request.toggle_rank(rank);
        prop_assert_eq!(request.sinta_ranks, before);
    }

    #[test]
    fn categories_stay_in_catalog(ids in prop::collection::vec(any::<u8>(), 0..30)) {
        let mut request = ScrapeSintaRequest::default();
        for id in ids {
            request.toggle_category(id);
        }
        prop_assert!(request.filter_area_codes.iter().all(|id| (1..=10).contains(id)));
    }
}
