use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Joker {
    Small,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Suited { rank: Rank, suit: Suit },
    Joker(Joker),
}

/// A physical card. Two decks are in play, so `deck` tells identical faces apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub face: Face,
    pub deck: u8,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            face: Face::Suited { rank, suit },
            deck: 0,
        }
    }

    pub const fn joker(joker: Joker) -> Self {
        Self {
            face: Face::Joker(joker),
            deck: 0,
        }
    }

    /// Same face, different physical copy.
    pub const fn copy(self, deck: u8) -> Self {
        Self { face: self.face, deck }
    }

    pub const fn rank(self) -> Option<Rank> {
        match self.face {
            Face::Suited { rank, .. } => Some(rank),
            Face::Joker(_) => None,
        }
    }

    pub const fn suit(self) -> Option<Suit> {
        match self.face {
            Face::Suited { suit, .. } => Some(suit),
            Face::Joker(_) => None,
        }
    }

    pub const fn joker_kind(self) -> Option<Joker> {
        match self.face {
            Face::Joker(joker) => Some(joker),
            Face::Suited { .. } => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self.face, Face::Joker(_))
    }

    pub const fn points(self) -> u8 {
        match self.face {
            Face::Suited { rank, .. } => rank.points(),
            Face::Joker(_) => 0,
        }
    }
}

pub fn total_points(cards: &[Card]) -> u16 {
    cards.iter().map(|card| u16::from(card.points())).sum()
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Suited { rank, suit } => write!(f, "{rank}{suit}"),
            Face::Joker(Joker::Small) => f.write_str("SJ"),
            Face::Joker(Joker::Big) => f.write_str("BJ"),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deck == 0 {
            write!(f, "{}", self.face)
        } else {
            write!(f, "{}#{}", self.face, self.deck)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("card notation is empty")]
    Empty,
    #[error("unknown rank '{0}'")]
    Rank(String),
    #[error("unknown suit '{0}'")]
    Suit(String),
    #[error("invalid deck copy '{0}'")]
    Deck(String),
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ParseCardError::Empty);
        }

        let (face_text, deck) = match text.split_once('#') {
            Some((face, deck)) => {
                let deck = deck
                    .parse::<u8>()
                    .map_err(|_| ParseCardError::Deck(deck.to_string()))?;
                (face, deck)
            }
            None => (text, 0),
        };

        let face = match face_text.to_ascii_uppercase().as_str() {
            "SJ" => Face::Joker(Joker::Small),
            "BJ" => Face::Joker(Joker::Big),
            _ => {
                let mut chars = face_text.chars();
                let suit_char = chars.next_back().ok_or(ParseCardError::Empty)?;
                let suit = Suit::from_symbol(suit_char)
                    .ok_or_else(|| ParseCardError::Suit(suit_char.to_string()))?;
                let rank_text = chars.as_str();
                let rank = Rank::from_symbol(rank_text)
                    .ok_or_else(|| ParseCardError::Rank(rank_text.to_string()))?;
                Face::Suited { rank, suit }
            }
        };

        Ok(Card { face, deck })
    }
}

/// Parse a whitespace separated list such as `"2H 2H#1 BJ"`.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardError> {
    text.split_whitespace().map(str::parse).collect()
}
