//! Elimination bracket engine.
//!
//! This module provides the bracket core:
//! - Round seeding (full permutation or uniform power-of-two subset)
//! - Round-by-round pairwise progression with bye handling
//! - Snapshot-ready state with invariant validation on load

pub mod errors;
pub mod models;
pub mod seeder;
pub mod state_machine;

pub use errors::{BracketError, BracketResult};
pub use models::{
    BracketState, Candidate, GameId, MediaKind, MediaRef, OwnerId, RoundSize, Snapshot,
};
pub use seeder::select_round;
pub use state_machine::{Bracket, PickOutcome, Side};
