//! Leaderboard payload and ranking rules.
//!
//! Lower scores are better. Entries whose score is missing, empty or not a
//! number sink to the bottom, and only the top [`LEADERBOARD_LIMIT`] rows
//! are ever shown, however many the backend returns.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of ranked rows displayed.
pub const LEADERBOARD_LIMIT: usize = 9;

/// Name shown for rows without one.
const ANONYMOUS: &str = "Anonymous";

/// One row as sent by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player nickname.
    #[serde(default)]
    pub name: Option<String>,
    /// Score as text (minutes, e.g. `"10.25"`); numbers are accepted too.
    #[serde(default, deserialize_with = "score_text")]
    pub score: Option<String>,
}

impl LeaderboardEntry {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, score: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            score: Some(score.into()),
        }
    }

    /// Numeric value of the score, if it parses to a finite number.
    #[must_use]
    pub fn numeric_score(&self) -> Option<f64> {
        self.score
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// `GET /leaderboard/` response; `leaderboard` may be `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Rows in backend order.
    #[serde(default)]
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
}

impl Leaderboard {
    /// Rows, treating `null` as empty.
    #[must_use]
    pub fn entries(self) -> Vec<LeaderboardEntry> {
        self.leaderboard.unwrap_or_default()
    }
}

/// A row ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    /// Player name, or "Anonymous".
    pub name: String,
    /// Score text as received (empty when missing).
    pub score: String,
}

/// Sort ascending by numeric score, non-numeric last, keep the top nine.
///
/// The sort is stable: ties and unscored rows keep backend order.
#[must_use]
pub fn rank(entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    let mut keyed: Vec<(Option<f64>, LeaderboardEntry)> = entries
        .into_iter()
        .map(|e| (e.numeric_score(), e))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed
        .into_iter()
        .take(LEADERBOARD_LIMIT)
        .enumerate()
        .map(|(i, (_, entry))| RankedEntry {
            rank: i + 1,
            name: entry
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            score: entry.score.unwrap_or_default(),
        })
        .collect()
}

/// Accept `"10.25"`, `10.25` or `null` for a score.
fn score_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ranked: &[RankedEntry]) -> Vec<&str> {
        ranked.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn sorts_ascending_by_numeric_value() {
        let ranked = rank(vec![
            LeaderboardEntry::new("C", "15.75"),
            LeaderboardEntry::new("A", "10.25"),
            LeaderboardEntry::new("B", "12.50"),
        ]);
        assert_eq!(names(&ranked), vec!["A", "B", "C"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].score, "10.25");
    }

    #[test]
    fn numeric_not_lexicographic() {
        let ranked = rank(vec![
            LeaderboardEntry::new("slow", "369"),
            LeaderboardEntry::new("fast", "105"),
            LeaderboardEntry::new("mid", "99.5"),
        ]);
        assert_eq!(names(&ranked), vec!["mid", "fast", "slow"]);
    }

    #[test]
    fn empty_and_missing_scores_sort_last() {
        let ranked = rank(vec![
            LeaderboardEntry::new("blank", ""),
            LeaderboardEntry {
                name: Some("none".to_string()),
                score: None,
            },
            LeaderboardEntry::new("junk", "n/a"),
            LeaderboardEntry::new("real", "8.00"),
        ]);
        assert_eq!(names(&ranked), vec!["real", "blank", "none", "junk"]);
    }

    #[test]
    fn only_nine_rows_survive() {
        let entries = (0..100)
            .map(|i| LeaderboardEntry::new(format!("Player{}", i + 1), format!("{}", 10 + i)))
            .collect();
        let ranked = rank(entries);
        assert_eq!(ranked.len(), LEADERBOARD_LIMIT);
        assert_eq!(ranked[8].name, "Player9");
        assert_eq!(ranked[8].rank, 9);
    }

    #[test]
    fn missing_name_becomes_anonymous() {
        let ranked = rank(vec![LeaderboardEntry {
            name: None,
            score: Some("10.00".to_string()),
        }]);
        assert_eq!(ranked[0].name, "Anonymous");
    }

    #[test]
    fn null_leaderboard_is_empty() {
        let board: Leaderboard = serde_json::from_str(r#"{"leaderboard": null}"#).unwrap();
        assert!(board.entries().is_empty());
    }

    #[test]
    fn numeric_json_scores_are_accepted() {
        let board: Leaderboard =
            serde_json::from_str(r#"{"leaderboard": [{"name": "P", "score": 12.5}, {"name": "Q"}]}"#)
                .unwrap();
        let entries = board.entries();
        assert_eq!(entries[0].score.as_deref(), Some("12.5"));
        assert_eq!(entries[1].score, None);
    }
}
