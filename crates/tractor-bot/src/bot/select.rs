use std::cmp::Reverse;
use tractor_core::model::card::Card;
use tractor_core::model::combo::Combo;
use tractor_core::model::trump::TrumpInfo;
use tractor_core::rules::value::ValueMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Highest,
    Lowest,
}

/// Top `n` combos by value under `mode`. Ties keep their input order.
pub fn select_combos(
    combos: &[Combo],
    mode: ValueMode,
    direction: Direction,
    n: usize,
    trump: TrumpInfo,
) -> Vec<Combo> {
    let mut ranked: Vec<&Combo> = combos.iter().collect();
    match direction {
        Direction::Lowest => ranked.sort_by_key(|combo| trump.combo_value(&combo.cards, mode)),
        Direction::Highest => {
            ranked.sort_by_key(|combo| Reverse(trump.combo_value(&combo.cards, mode)))
        }
    }
    ranked.into_iter().take(n).cloned().collect()
}

/// Top `n` cards by value under `mode`. Ties keep their input order.
pub fn select_cards(
    cards: &[Card],
    mode: ValueMode,
    direction: Direction,
    n: usize,
    trump: TrumpInfo,
) -> Vec<Card> {
    let mut ranked = cards.to_vec();
    match direction {
        Direction::Lowest => ranked.sort_by_key(|&card| trump.value(card, mode)),
        Direction::Highest => ranked.sort_by_key(|&card| Reverse(trump.value(card, mode))),
    }
    ranked.truncate(n);
    ranked
}

/// Cards in the order they should be thrown away: plain before trump,
/// pointless before point cards, loose cards before pair members, then by
/// strategic value.
pub fn disposal_order(cards: &[Card], trump: TrumpInfo) -> Vec<Card> {
    let mut ranked = cards.to_vec();
    ranked.sort_by_key(|&card| {
        let key = trump.key(card);
        let paired = cards
            .iter()
            .any(|&other| other != card && trump.key(other) == key);
        (
            trump.is_trump(card),
            card.points() > 0,
            paired,
            trump.value(card, ValueMode::Strategic),
        )
    });
    ranked
}
