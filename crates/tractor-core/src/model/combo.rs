use crate::model::card::{Card, total_points};
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboKind {
    Single,
    Pair,
    Tractor,
}

impl ComboKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComboKind::Single => "single",
            ComboKind::Pair => "pair",
            ComboKind::Tractor => "tractor",
        }
    }
}

impl fmt::Display for ComboKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A playable unit. `cards` are ordered weakest first; `value` is the basic
/// strategic value of the combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    pub kind: ComboKind,
    pub cards: Vec<Card>,
    pub value: i32,
}

impl Combo {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn points(&self) -> u16 {
        total_points(&self.cards)
    }

    pub fn pair_count(&self) -> usize {
        match self.kind {
            ComboKind::Single => 0,
            ComboKind::Pair | ComboKind::Tractor => self.cards.len() / 2,
        }
    }

    /// Whether `cards` hold exactly this combo's physical cards, in any order.
    pub fn same_cards(&self, cards: &[Card]) -> bool {
        cards.len() == self.cards.len() && self.cards.iter().all(|card| cards.contains(card))
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        for (idx, card) in self.cards.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}
