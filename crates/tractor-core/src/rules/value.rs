use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::trump::{Lane, TrumpInfo};
use serde::{Deserialize, Serialize};

const TRUMP_SUIT_BASE: i32 = 100;
const TRUMP_RANK_OFF_SUIT: i32 = 160;
const TRUMP_RANK_IN_SUIT: i32 = 185;
const SMALL_JOKER: i32 = 210;
const BIG_JOKER: i32 = 220;

const STRATEGIC_POINT_BONUS: i32 = 2;
const CONTRIBUTE_POINT_PENALTY: i32 = 3;
const CONTRIBUTE_TEN_PENALTY: i32 = 5;

/// Intent behind a value lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueMode {
    /// Trump tier and rank only.
    Basic,
    /// Point cards look more valuable so disposal keeps them.
    Strategic,
    /// Point cards look cheaper, tens cheapest, so feeding picks them first.
    Contribute,
}

impl TrumpInfo {
    pub fn value(&self, card: Card, mode: ValueMode) -> i32 {
        let base = self.basic_value(card);
        let points = i32::from(card.points());
        match mode {
            ValueMode::Basic => base,
            ValueMode::Strategic => base + points * STRATEGIC_POINT_BONUS,
            ValueMode::Contribute => {
                let ten = if card.rank() == Some(Rank::Ten) {
                    CONTRIBUTE_TEN_PENALTY
                } else {
                    0
                };
                base - points * CONTRIBUTE_POINT_PENALTY - ten
            }
        }
    }

    /// Mean card value; keeps combos on the same scale as single cards.
    pub fn combo_value(&self, cards: &[Card], mode: ValueMode) -> i32 {
        if cards.is_empty() {
            return 0;
        }
        let total: i32 = cards.iter().map(|&card| self.value(card, mode)).sum();
        total / cards.len() as i32
    }

    fn basic_value(&self, card: Card) -> i32 {
        let key = self.key(card);
        let rank_value = card.rank().map(|rank| i32::from(rank.value())).unwrap_or(0);
        match key.lane {
            Lane::Plain(_) => rank_value,
            Lane::TrumpSuit => TRUMP_SUIT_BASE + rank_value,
            Lane::TrumpRank(_) => TRUMP_RANK_OFF_SUIT,
            Lane::TrumpRankInSuit => TRUMP_RANK_IN_SUIT,
            Lane::Jokers if key.order == 0 => SMALL_JOKER,
            Lane::Jokers => BIG_JOKER,
        }
    }
}
