use crate::model::card::{Card, Face, Joker};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Trump declaration for a round. `suit` is `None` when no suit was declared,
/// leaving only jokers and trump-rank cards as trump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrumpInfo {
    pub rank: Rank,
    pub suit: Option<Suit>,
}

/// The group a card follows in: the trump group or its natural suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuitGroup {
    Trump,
    Plain(Suit),
}

impl SuitGroup {
    pub const ALL: [SuitGroup; 5] = [
        SuitGroup::Plain(Suit::Clubs),
        SuitGroup::Plain(Suit::Diamonds),
        SuitGroup::Plain(Suit::Hearts),
        SuitGroup::Plain(Suit::Spades),
        SuitGroup::Trump,
    ];

    pub const fn index(self) -> usize {
        match self {
            SuitGroup::Plain(suit) => suit.index(),
            SuitGroup::Trump => 4,
        }
    }

    pub const fn is_trump(self) -> bool {
        matches!(self, SuitGroup::Trump)
    }
}

impl fmt::Display for SuitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuitGroup::Trump => f.write_str("trump"),
            SuitGroup::Plain(suit) => write!(f, "{suit}"),
        }
    }
}

/// Where a card sits in the trump-aware hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    Plain(Suit),
    TrumpSuit,
    TrumpRank(Suit),
    TrumpRankInSuit,
    Jokers,
}

impl Lane {
    pub const fn tier(self) -> u8 {
        match self {
            Lane::Plain(_) => 0,
            Lane::TrumpSuit => 1,
            Lane::TrumpRank(_) => 2,
            Lane::TrumpRankInSuit => 3,
            Lane::Jokers => 4,
        }
    }

    /// Lanes whose `order` forms a run that pairs can chain along.
    pub const fn chains(self) -> bool {
        matches!(self, Lane::Plain(_) | Lane::TrumpSuit | Lane::Jokers)
    }

    pub const fn group(self) -> SuitGroup {
        match self {
            Lane::Plain(suit) => SuitGroup::Plain(suit),
            _ => SuitGroup::Trump,
        }
    }
}

/// Trump-aware grouping key. Cards with equal keys pair; keys in one chaining
/// lane with consecutive `order` form tractors; `strength` ranks keys within
/// a suit group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    pub lane: Lane,
    pub order: u8,
}

impl CardKey {
    pub const fn strength(self) -> (u8, u8) {
        (self.lane.tier(), self.order)
    }

    pub const fn group(self) -> SuitGroup {
        self.lane.group()
    }
}

impl TrumpInfo {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit: Some(suit),
        }
    }

    pub const fn no_suit(rank: Rank) -> Self {
        Self { rank, suit: None }
    }

    pub fn is_trump(&self, card: Card) -> bool {
        match card.face {
            Face::Joker(_) => true,
            Face::Suited { rank, suit } => rank == self.rank || Some(suit) == self.suit,
        }
    }

    pub fn group(&self, card: Card) -> SuitGroup {
        self.key(card).group()
    }

    pub fn key(&self, card: Card) -> CardKey {
        match card.face {
            Face::Joker(Joker::Small) => CardKey {
                lane: Lane::Jokers,
                order: 0,
            },
            Face::Joker(Joker::Big) => CardKey {
                lane: Lane::Jokers,
                order: 1,
            },
            Face::Suited { rank, suit } if rank == self.rank => {
                let lane = if Some(suit) == self.suit {
                    Lane::TrumpRankInSuit
                } else {
                    Lane::TrumpRank(suit)
                };
                CardKey { lane, order: 0 }
            }
            Face::Suited { rank, suit } => {
                let lane = if Some(suit) == self.suit {
                    Lane::TrumpSuit
                } else {
                    Lane::Plain(suit)
                };
                // The trump rank branch above owns the only rank without a sequence slot.
                let order = rank.sequence_index(self.rank).unwrap_or_default();
                CardKey { lane, order }
            }
        }
    }
}

impl fmt::Display for TrumpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{}{}", self.rank, suit),
            None => write!(f, "{}NT", self.rank),
        }
    }
}
