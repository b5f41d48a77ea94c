//! Elimination bracket state machine.
//!
//! The bracket walks strictly sequential adjacent pairs `(0,1), (2,3), ...`
//! of the current round. Each accepted pick appends the chosen candidate to
//! the advancing list; when a round's matches are exhausted an odd trailing
//! candidate advances automatically (the bye), and the advancing list either
//! becomes the next round or, at length one, finishes the tournament.

use serde::{Deserialize, Serialize};

use super::errors::{BracketError, BracketResult};
use super::models::{BracketState, Candidate, GameId};

/// Which side of the current pair the user picked
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// What a pick did to the bracket
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    /// Same round, next adjacent pair
    NextMatch,
    /// Round rolled over; `size` is the new round's entrant count
    NewRound { size: usize },
    /// Tournament finished
    Finished { winner: Candidate },
}

/// A running single-elimination bracket.
///
/// Owns its [`BracketState`] for the duration of one playthrough. The
/// machine is purely in-memory; persistence and winner recording are the
/// caller's concern (see [`crate::session::PlaythroughSession`]).
#[derive(Clone, Debug)]
pub struct Bracket {
    state: BracketState,
    winner: Option<Candidate>,
    first_round: bool,
}

impl Bracket {
    /// Start a bracket from a freshly seeded round.
    ///
    /// # Errors
    ///
    /// * `BracketError::PoolTooSmall` - fewer than 2 candidates
    /// * `BracketError::DuplicateCandidate` - a candidate appears twice
    pub fn new(game_id: GameId, candidates: Vec<Candidate>) -> BracketResult<Self> {
        let state = BracketState::new(game_id, candidates);
        state.validate()?;
        Ok(Self {
            state,
            winner: None,
            first_round: true,
        })
    }

    /// Resume a bracket from a stored state.
    ///
    /// The state is re-validated; a snapshot that violates the mid-round
    /// invariants is rejected rather than silently accepted.
    pub fn from_state(state: BracketState) -> BracketResult<Self> {
        state.validate()?;
        Ok(Self {
            state,
            winner: None,
            // The requested-size display special case only applies to a
            // freshly selected round, never to a resumed one.
            first_round: false,
        })
    }

    /// The bracket's current state (for persistence)
    #[must_use]
    pub fn state(&self) -> &BracketState {
        &self.state
    }

    /// Game this bracket belongs to
    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.state.game_id
    }

    /// Whether the tournament has finished
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Tournament winner, once finished
    #[must_use]
    pub fn winner(&self) -> Option<&Candidate> {
        self.winner.as_ref()
    }

    /// Round size label for the round about to be played.
    ///
    /// The very first round shows the literally requested size (which is the
    /// round's own entrant count, since seeding returns exactly the requested
    /// number of candidates); afterwards the label previews the upcoming
    /// round, `ceil(len / 2)` of the current one.
    #[must_use]
    pub fn display_round_size(&self) -> usize {
        if self.first_round {
            self.state.round_candidates.len()
        } else {
            self.state.round_candidates.len().div_ceil(2)
        }
    }

    /// The pair contesting the current match.
    ///
    /// # Errors
    ///
    /// * `BracketError::AlreadyFinished` - tournament is over
    /// * `BracketError::NoActiveMatch` - no complete pair at the match index
    pub fn current_pair(&self) -> BracketResult<(&Candidate, &Candidate)> {
        if self.winner.is_some() {
            return Err(BracketError::AlreadyFinished);
        }
        let left = 2 * self.state.match_index;
        let right = left + 1;
        if right >= self.state.round_candidates.len() {
            return Err(BracketError::NoActiveMatch);
        }
        Ok((
            &self.state.round_candidates[left],
            &self.state.round_candidates[right],
        ))
    }

    /// Record the user's pick for the current match and advance the bracket.
    ///
    /// # Errors
    ///
    /// * `BracketError::AlreadyFinished` - pick after the tournament ended
    /// * `BracketError::NoActiveMatch` - no complete pair to pick from
    pub fn record_pick(&mut self, side: Side) -> BracketResult<PickOutcome> {
        let (left, right) = self.current_pair()?;
        let chosen = match side {
            Side::Left => left.clone(),
            Side::Right => right.clone(),
        };
        self.state.advancing.push(chosen);

        let total_matches = self.state.total_matches();
        if self.state.match_index + 1 < total_matches {
            self.state.match_index += 1;
            return Ok(PickOutcome::NextMatch);
        }

        // Round exhausted. An odd trailing candidate advances as the bye,
        // exactly once.
        if self.state.round_candidates.len() % 2 == 1 {
            if let Some(bye) = self.state.round_candidates.last() {
                if !self.state.advancing.contains(bye) {
                    let bye = bye.clone();
                    self.state.advancing.push(bye);
                }
            }
        }

        if self.state.advancing.len() == 1 {
            let winner = self.state.advancing.remove(0);
            self.winner = Some(winner.clone());
            Ok(PickOutcome::Finished { winner })
        } else {
            self.state.round_candidates = std::mem::take(&mut self.state.advancing);
            self.state.match_index = 0;
            self.first_round = false;
            Ok(PickOutcome::NewRound {
                size: self.state.round_candidates.len(),
            })
        }
    }
}
