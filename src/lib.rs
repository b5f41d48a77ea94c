//! # Favorite Cup
//!
//! A single-elimination "favorite pick" tournament engine over media
//! candidates (images, animated clips, embedded videos), with resumable
//! brackets and a leaderboard of historical winners.
//!
//! ## Architecture
//!
//! A playthrough flows through a handful of small components:
//!
//! - **Seeder**: picks the opening round — the full pool randomly permuted,
//!   or a uniform power-of-two subset
//! - **Bracket**: the state machine — strictly sequential adjacent pairs,
//!   bye handling for odd rounds, round rollover, finish detection
//! - **Persistence**: a single-slot local snapshot store (same-device
//!   resume) plus a durable per-user registry (cross-device resume), both
//!   producing one canonical snapshot shape
//! - **Records**: validated winner emission and a leaderboard aggregator
//!   derived from accumulated play records
//! - **Session**: wires it all together and hands the hosting UI explicit
//!   in-process transition events
//!
//! Rendering, routing, authentication and content management are external
//! callers of these interfaces, not part of the engine.
//!
//! ## Example
//!
//! ```
//! use favorite_cup::bracket::{Bracket, Candidate, MediaKind, PickOutcome, Side};
//!
//! let candidates = vec![
//!     Candidate::new("dawn", "https://cdn.example.com/dawn.png", MediaKind::Image),
//!     Candidate::new("dusk", "https://cdn.example.com/dusk.png", MediaKind::Image),
//! ];
//! let mut bracket = Bracket::new(1, candidates).unwrap();
//! let outcome = bracket.record_pick(Side::Left).unwrap();
//! assert!(matches!(outcome, PickOutcome::Finished { .. }));
//! ```

/// Elimination bracket engine: seeding, state machine, snapshot models.
pub mod bracket;
pub use bracket::{
    Bracket, BracketError, BracketResult, BracketState, Candidate, GameId, MediaKind, MediaRef,
    OwnerId, PickOutcome, RoundSize, Side, Snapshot, select_round,
};

/// Read-only boundary to the external content provider.
pub mod content;
pub use content::{ContentError, ContentProvider, ContentResult, StaticContent};

/// Local and durable snapshot persistence.
pub mod persistence;
pub use persistence::{
    KeyValueStore, LocalSnapshotStore, MemoryKeyValue, MemoryResumeRegistry, PersistenceError,
    PersistenceResult, PgResumeRegistry, ResumeRegistry,
};

/// Winner records and leaderboard aggregation.
pub mod records;
pub use records::{
    MemoryPlayRecordStore, PgPlayRecordStore, PlayRecord, PlayRecordStore, RankingAggregator,
    RankingEntry, RankingSummary, RecordError, RecordResult, WinnerRecorder,
};

/// Playthrough orchestration for hosting UIs.
pub mod session;
pub use session::{PlaythroughSession, SessionConfig, SessionError, SessionEvent};
