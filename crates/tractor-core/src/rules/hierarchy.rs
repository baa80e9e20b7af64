use crate::model::card::Card;
use crate::model::trump::{CardKey, SuitGroup, TrumpInfo};
use crate::rules::detect::classify_play;
use std::cmp::Ordering;

impl TrumpInfo {
    /// Head-to-head strength. `None` when the cards sit in different plain
    /// suits and cannot be ranked against each other.
    pub fn compare(&self, a: Card, b: Card) -> Option<Ordering> {
        let key_a = self.key(a);
        let key_b = self.key(b);
        match (key_a.group(), key_b.group()) {
            (SuitGroup::Trump, SuitGroup::Plain(_)) => Some(Ordering::Greater),
            (SuitGroup::Plain(_), SuitGroup::Trump) => Some(Ordering::Less),
            (left, right) if left == right => Some(key_a.strength().cmp(&key_b.strength())),
            _ => None,
        }
    }

    /// Strongest key among `cards`.
    pub fn top_key(&self, cards: &[Card]) -> Option<CardKey> {
        cards
            .iter()
            .map(|&card| self.key(card))
            .max_by(|a, b| a.strength().cmp(&b.strength()).then(a.lane.cmp(&b.lane)))
    }

    /// The single suit group every card belongs to, if there is one.
    pub fn shared_group(&self, cards: &[Card]) -> Option<SuitGroup> {
        let first = self.group(*cards.first()?);
        cards
            .iter()
            .all(|&card| self.group(card) == first)
            .then_some(first)
    }
}

/// Whether `play` takes the trick away from `winning`.
///
/// The play must match the winning play's shape. A trump play beats any
/// plain play; within one group the strictly stronger top card wins, so ties
/// stay with whoever played first.
pub fn beats(play: &[Card], winning: &[Card], trump: TrumpInfo) -> bool {
    let (Some(play_kind), Some(winning_kind)) =
        (classify_play(play, trump), classify_play(winning, trump))
    else {
        return false;
    };
    if play_kind != winning_kind || play.len() != winning.len() {
        return false;
    }

    let (Some(play_top), Some(winning_top)) = (trump.top_key(play), trump.top_key(winning)) else {
        return false;
    };

    match (play_top.group(), winning_top.group()) {
        (SuitGroup::Trump, SuitGroup::Plain(_)) => true,
        (left, right) if left == right => play_top.strength() > winning_top.strength(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::beats;
    use crate::model::card::{Card, parse_cards};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::TrumpInfo;
    use std::cmp::Ordering;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    fn trump() -> TrumpInfo {
        TrumpInfo::new(Rank::Two, Suit::Spades)
    }

    #[test]
    fn plain_cards_compare_within_suit_only() {
        let trump = trump();
        assert_eq!(trump.compare(card("KH"), card("QH")), Some(Ordering::Greater));
        assert_eq!(trump.compare(card("KH"), card("QD")), None);
    }

    #[test]
    fn trump_outranks_plain() {
        let trump = trump();
        assert_eq!(trump.compare(card("3S"), card("AH")), Some(Ordering::Greater));
        assert_eq!(trump.compare(card("AD"), card("2C")), Some(Ordering::Less));
    }

    #[test]
    fn off_suit_trump_ranks_tie() {
        let trump = trump();
        assert_eq!(trump.compare(card("2H"), card("2D")), Some(Ordering::Equal));
        assert_eq!(trump.compare(card("2S"), card("2D")), Some(Ordering::Greater));
    }

    #[test]
    fn higher_pair_beats_lower_pair() {
        let trump = trump();
        let winning = parse_cards("9H 9H#1").unwrap();
        let play = parse_cards("JH JH#1").unwrap();
        assert!(beats(&play, &winning, trump));
        assert!(!beats(&winning, &play, trump));
    }

    #[test]
    fn trump_pair_ruffs_plain_pair() {
        let trump = trump();
        let winning = parse_cards("AH AH#1").unwrap();
        let play = parse_cards("3S 3S#1").unwrap();
        assert!(beats(&play, &winning, trump));
    }

    #[test]
    fn mismatched_shape_never_beats() {
        let trump = trump();
        let winning = parse_cards("9H 9H#1").unwrap();
        let play = parse_cards("3S 4S").unwrap();
        assert!(!beats(&play, &winning, trump));
    }

    #[test]
    fn equal_strength_stays_with_first() {
        let trump = trump();
        assert!(!beats(&[card("2D")], &[card("2H")], trump));
    }

    #[test]
    fn off_suit_plain_never_beats() {
        let trump = trump();
        assert!(!beats(&[card("AD")], &[card("3H")], trump));
    }
}
