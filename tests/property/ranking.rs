//! Property tests for leaderboard ranking and score presentation.
//!
//! Uses proptest to verify:
//! 1. Ranked output never exceeds nine rows and ranks are 1..=n.
//! 2. Numeric scores come out in ascending order, ahead of unscored rows.
//! 3. `format_elapsed` always reconstructs the original second count.
//! 4. The displayed "top X%" always equals `100 - P`.

use bureausim_proto::leaderboard::{LEADERBOARD_LIMIT, LeaderboardEntry, rank};
use bureausim_proto::score::{Percentile, format_elapsed};
use proptest::prelude::*;

/// Strategy for a score cell: numeric text, junk, empty, or missing.
fn arb_score() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        (0u32..100_000).prop_map(|n| Some(format!("{}.{:02}", n / 100, n % 100))),
        Just(Some(String::new())),
        "[a-z]{1,6}".prop_map(Some),
        Just(None),
    ]
}

fn arb_entry() -> impl Strategy<Value = LeaderboardEntry> {
    ("[A-Za-z0-9]{1,12}", arb_score()).prop_map(|(name, score)| LeaderboardEntry {
        name: Some(name),
        score,
    })
}

proptest! {
    #[test]
    fn ranking_is_bounded_and_numbered(entries in prop::collection::vec(arb_entry(), 0..40)) {
        let total = entries.len();
        let ranked = rank(entries);
        prop_assert_eq!(ranked.len(), total.min(LEADERBOARD_LIMIT));
        for (i, row) in ranked.iter().enumerate() {
            prop_assert_eq!(row.rank, i + 1);
        }
    }

    #[test]
    fn numeric_rows_ascend_before_unscored(entries in prop::collection::vec(arb_entry(), 0..40)) {
        let ranked = rank(entries);
        let values: Vec<Option<f64>> = ranked
            .iter()
            .map(|r| r.score.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();
        let mut seen_unscored = false;
        let mut last = f64::NEG_INFINITY;
        for value in values {
            match value {
                Some(v) => {
                    prop_assert!(!seen_unscored, "numeric row after unscored row");
                    prop_assert!(v >= last);
                    last = v;
                }
                None => seen_unscored = true,
            }
        }
    }

    #[test]
    fn elapsed_format_round_trips(seconds in 0u64..1_000_000) {
        let text = format_elapsed(seconds);
        let (mins, secs) = text.split_once(':').unwrap();
        prop_assert_eq!(secs.len(), 2);
        prop_assert!(mins.len() >= 2);
        let rebuilt = mins.parse::<u64>().unwrap() * 60 + secs.parse::<u64>().unwrap();
        prop_assert_eq!(rebuilt, seconds);
    }

    #[test]
    fn top_percent_is_complement(p in 0u8..=100) {
        prop_assert_eq!(u32::from(Percentile::new(p).top_percent()), 100 - u32::from(p));
    }
}
