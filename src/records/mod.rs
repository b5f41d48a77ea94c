//! Winner records and leaderboard aggregation.
//!
//! - [`store`]: append-only play record storage (memory and Postgres)
//! - [`recorder`]: validated winner emission, at-least-once
//! - [`aggregator`]: per-game leaderboard derived from accumulated records

pub mod aggregator;
pub mod errors;
pub mod models;
pub mod recorder;
pub mod store;

pub use aggregator::RankingAggregator;
pub use errors::{RecordError, RecordResult};
pub use models::{DEFAULT_RANKING_LIMIT, PlayRecord, RankingEntry, RankingSummary};
pub use recorder::WinnerRecorder;
pub use store::{MemoryPlayRecordStore, PgPlayRecordStore, PlayRecordStore};
