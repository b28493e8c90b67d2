//! Randomized checks of the paginated index against a linear scan.

use proptest::prelude::*;

use crate::PaginatedIndex;

fn interval() -> impl Strategy<Value = (i32, i32)> {
    (-5_000i32..5_000, 0i32..3_000).prop_map(|(start, len)| (start, start + len))
}

fn brute_force(intervals: &[(i32, i32)], offset: i32, start: i32, end: i32) -> Vec<usize> {
    intervals
        .iter()
        .enumerate()
        .filter(|(_, (s, e))| s + offset <= end && e + offset >= start)
        .map(|(i, _)| i)
        .collect()
}

proptest! {
    #[test]
    fn query_matches_linear_scan(
        intervals in prop::collection::vec(interval(), 0..200),
        page_size in prop::sample::select(vec![50.0f32, 100.0, 250.0, 1000.0]),
        offset in -2_000i32..2_000,
        query in interval(),
    ) {
        let mut index = PaginatedIndex::new(page_size);
        for (i, (start, end)) in intervals.iter().enumerate() {
            index.add(i, *start as f32, *end as f32).unwrap();
        }
        index.translate(offset as f32);

        let mut found = index.query_vec(query.0 as f32, query.1 as f32);
        let unique = found.len();
        found.sort_unstable();
        found.dedup();
        prop_assert_eq!(found.len(), unique, "an entry was reported twice");
        prop_assert_eq!(found, brute_force(&intervals, offset, query.0, query.1));
    }

    #[test]
    fn entries_added_after_translation_share_the_frame(
        before in prop::collection::vec(interval(), 1..50),
        after in prop::collection::vec(interval(), 1..50),
        offset in -3_000i32..3_000,
        query in interval(),
    ) {
        let mut index = PaginatedIndex::new(200.0);
        for (i, (start, end)) in before.iter().enumerate() {
            index.add(i, *start as f32, *end as f32).unwrap();
        }
        index.translate(offset as f32);
        for (i, (start, end)) in after.iter().enumerate() {
            index.add(before.len() + i, *start as f32, *end as f32).unwrap();
        }

        let shifted: Vec<(i32, i32)> = before
            .iter()
            .map(|(s, e)| (s + offset, e + offset))
            .chain(after.iter().copied())
            .collect();
        let mut found = index.query_vec(query.0 as f32, query.1 as f32);
        found.sort_unstable();
        prop_assert_eq!(found, brute_force(&shifted, 0, query.0, query.1));
    }
}
