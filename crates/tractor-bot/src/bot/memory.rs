use std::collections::HashSet;
use tractor_core::model::card::{Card, total_points};
use tractor_core::model::deck::Deck;
use tractor_core::model::player::PlayerPosition;
use tractor_core::model::trump::{SuitGroup, TrumpInfo};
use tractor_core::rules::detect::identify_combos;
use tractor_core::rules::hierarchy::beats;

const TOTAL_POINTS: u16 = 200;

/// Facts about the round so far, handed to each decision by the caller.
///
/// A decision only ever reads the snapshot. The caller updates its own copy
/// between decisions with [`MemorySnapshot::record_play`].
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    played: Vec<Card>,
    voids: [[bool; 5]; 4],
    remaining_points: u16,
}

impl Default for MemorySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self {
            played: Vec::new(),
            voids: [[false; 5]; 4],
            remaining_points: TOTAL_POINTS,
        }
    }

    pub fn played(&self) -> &[Card] {
        &self.played
    }

    /// Points not yet seen in any trick.
    pub fn remaining_points(&self) -> u16 {
        self.remaining_points
    }

    pub fn is_void(&self, seat: PlayerPosition, group: SuitGroup) -> bool {
        self.voids[seat.index()][group.index()]
    }

    pub fn mark_void(&mut self, seat: PlayerPosition, group: SuitGroup) {
        self.voids[seat.index()][group.index()] = true;
    }

    /// Record a play. A follower who shows a card outside the led group has
    /// run out of that group.
    pub fn record_play(
        &mut self,
        seat: PlayerPosition,
        cards: &[Card],
        lead_group: Option<SuitGroup>,
        trump: TrumpInfo,
    ) {
        if let Some(group) = lead_group
            && cards.iter().any(|&card| trump.group(card) != group)
        {
            self.mark_void(seat, group);
        }
        self.remaining_points = self.remaining_points.saturating_sub(total_points(cards));
        self.played.extend_from_slice(cards);
    }

    /// Whether nothing still out of sight can beat `cards` in their own group.
    ///
    /// Unseen cards are the double deck minus what has been played, what we
    /// hold, and what is `visible` on the table.
    pub fn is_biggest_remaining(
        &self,
        cards: &[Card],
        hand: &[Card],
        visible: &[Card],
        trump: TrumpInfo,
    ) -> bool {
        let Some(group) = trump.shared_group(cards) else {
            return false;
        };
        let seen: HashSet<Card> = self
            .played
            .iter()
            .chain(hand)
            .chain(visible)
            .chain(cards)
            .copied()
            .collect();
        let unseen: Vec<Card> = Deck::double()
            .into_cards()
            .into_iter()
            .filter(|card| !seen.contains(card) && trump.group(*card) == group)
            .collect();
        if unseen.is_empty() {
            return true;
        }

        match identify_combos(&unseen, trump) {
            Ok(combos) => !combos
                .iter()
                .any(|combo| beats(&combo.cards, cards, trump)),
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tractor_core::model::card::parse_cards;
    use tractor_core::model::rank::Rank;
    use tractor_core::model::suit::Suit;

    fn trump() -> TrumpInfo {
        TrumpInfo::new(Rank::Two, Suit::Spades)
    }

    fn cards(text: &str) -> Vec<Card> {
        parse_cards(text).unwrap()
    }

    #[test]
    fn failing_to_follow_marks_void() {
        let mut memory = MemorySnapshot::new();
        let hearts = SuitGroup::Plain(Suit::Hearts);
        memory.record_play(PlayerPosition::East, &cards("3C"), Some(hearts), trump());
        assert!(memory.is_void(PlayerPosition::East, hearts));
        assert!(!memory.is_void(PlayerPosition::West, hearts));
    }

    #[test]
    fn remaining_points_drop_with_plays() {
        let mut memory = MemorySnapshot::new();
        memory.record_play(PlayerPosition::North, &cards("KH 10D"), None, trump());
        assert_eq!(memory.remaining_points(), 180);
        assert_eq!(memory.played().len(), 2);
    }

    #[test]
    fn ace_single_is_biggest_without_history() {
        let memory = MemorySnapshot::new();
        assert!(memory.is_biggest_remaining(&cards("AH"), &[], &[], trump()));
        assert!(!memory.is_biggest_remaining(&cards("KH"), &[], &[], trump()));
    }

    #[test]
    fn king_pair_becomes_biggest_once_an_ace_is_gone() {
        let mut memory = MemorySnapshot::new();
        let pair = cards("KH KH#1");
        assert!(!memory.is_biggest_remaining(&pair, &[], &[], trump()));

        memory.record_play(PlayerPosition::West, &cards("AH"), None, trump());
        assert!(memory.is_biggest_remaining(&pair, &[], &[], trump()));
    }

    #[test]
    fn own_hand_counts_as_seen() {
        let memory = MemorySnapshot::new();
        let hand = cards("AH AH#1");
        assert!(memory.is_biggest_remaining(&cards("KH"), &hand, &[], trump()));
    }
}
