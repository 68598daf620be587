//! In-memory record of finished runs.
//!
//! The [`ScoreStore`] keeps every submitted elapsed time so it can answer two
//! questions: how a new run compares to the ones before it (percentile), and
//! who the fastest players are (leaderboard).

use tokio::sync::RwLock;

use bureausim_proto::leaderboard::LeaderboardEntry;
use bureausim_proto::score::format_minutes;

/// Default cap on remembered runs before the slowest is dropped.
const DEFAULT_MAX_RECORDS: usize = 10_000;

/// One finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Player nickname.
    pub nickname: String,
    /// Elapsed time in seconds.
    pub seconds: u64,
}

/// Thread-safe store of finished runs, capped at a maximum size.
pub struct ScoreStore {
    records: RwLock<Vec<ScoreRecord>>,
    max_records: usize,
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore {
    /// Creates an empty store with the default cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_records(DEFAULT_MAX_RECORDS)
    }

    /// Creates an empty store with a custom cap.
    #[must_use]
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_records: max_records.max(1),
        }
    }

    /// Records a run and returns its percentile among earlier runs.
    ///
    /// The percentile is the share of earlier runs that were strictly
    /// slower, times 100. The very first run scores 100.
    #[allow(clippy::cast_precision_loss)]
    pub async fn record(&self, nickname: &str, seconds: u64) -> f64 {
        let mut records = self.records.write().await;

        let percentile = if records.is_empty() {
            100.0
        } else {
            let slower = records.iter().filter(|r| r.seconds > seconds).count();
            (slower as f64 / records.len() as f64 * 100.0).round()
        };

        records.push(ScoreRecord {
            nickname: nickname.to_string(),
            seconds,
        });
        if records.len() > self.max_records {
            // Drop the slowest run; it can no longer reach the leaderboard.
            if let Some((idx, _)) = records.iter().enumerate().max_by_key(|(_, r)| r.seconds) {
                records.swap_remove(idx);
            }
        }
        drop(records);

        percentile
    }

    /// All runs, fastest first, as leaderboard rows (score in minutes).
    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut records = self.records.read().await.clone();
        records.sort_by_key(|r| r.seconds);
        records
            .into_iter()
            .map(|r| LeaderboardEntry::new(r.nickname, format_minutes(r.seconds)))
            .collect()
    }

    /// Number of recorded runs.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no run has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
