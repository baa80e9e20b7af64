use crate::model::card::{Card, total_points};
use crate::model::player::PlayerPosition;
use crate::model::trump::{SuitGroup, TrumpInfo};
use crate::rules::hierarchy::beats;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trick {
    leader: PlayerPosition,
    plays: Vec<TrickPlay>,
    winner: Option<PlayerPosition>,
    points: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub position: PlayerPosition,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(PlayerPosition),
    #[error("a play needs at least one card")]
    EmptyPlay,
    #[error("lead was {expected} cards but {actual} were played")]
    LengthMismatch { expected: usize, actual: usize },
}

impl Trick {
    pub fn new(leader: PlayerPosition) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(4),
            winner: None,
            points: 0,
        }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    pub fn plays(&self) -> &[TrickPlay] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn lead(&self) -> Option<&[Card]> {
        self.plays.first().map(|play| play.cards.as_slice())
    }

    pub fn lead_group(&self, trump: TrumpInfo) -> Option<SuitGroup> {
        self.lead()
            .and_then(|cards| cards.first())
            .map(|&card| trump.group(card))
    }

    /// Seat currently holding the trick.
    pub fn winner(&self) -> Option<PlayerPosition> {
        self.winner
    }

    pub fn winning_play(&self) -> Option<&TrickPlay> {
        let winner = self.winner?;
        self.plays.iter().find(|play| play.position == winner)
    }

    pub fn points(&self) -> u16 {
        self.points
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.plays.iter().flat_map(|play| play.cards.iter())
    }

    pub fn expected_position(&self) -> PlayerPosition {
        self.plays
            .last()
            .map(|play| play.position.next())
            .unwrap_or(self.leader)
    }

    /// Record a play. Legality against the hand is the caller's concern; the
    /// trick only enforces turn order and lead length.
    pub fn play(
        &mut self,
        position: PlayerPosition,
        cards: Vec<Card>,
        trump: TrumpInfo,
    ) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }
        if cards.is_empty() {
            return Err(TrickError::EmptyPlay);
        }
        if self.plays.iter().any(|play| play.position == position) {
            return Err(TrickError::AlreadyPlayed(position));
        }

        let expected = self.expected_position();
        if expected != position {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }

        if let Some(lead) = self.lead() {
            if lead.len() != cards.len() {
                return Err(TrickError::LengthMismatch {
                    expected: lead.len(),
                    actual: cards.len(),
                });
            }
        }

        let takes_lead = match self.winning_play() {
            None => true,
            Some(current) => beats(&cards, &current.cards, trump),
        };
        if takes_lead {
            self.winner = Some(position);
        }
        self.points += total_points(&cards);
        self.plays.push(TrickPlay { position, cards });
        Ok(())
    }
}
