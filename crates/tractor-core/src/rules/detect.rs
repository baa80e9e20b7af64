use crate::error::RuleError;
use crate::model::card::Card;
use crate::model::combo::{Combo, ComboKind};
use crate::model::trump::{CardKey, Lane, TrumpInfo};
use crate::rules::value::ValueMode;
use std::collections::{BTreeMap, HashSet};

/// Every Single, Pair and Tractor available in `cards`, overlapping options
/// included.
///
/// Output order is fixed: singles, then pairs, each weakest first; then
/// tractors with the most pairs first, ties broken by the lowest start.
pub fn identify_combos(cards: &[Card], trump: TrumpInfo) -> Result<Vec<Combo>, RuleError> {
    if cards.is_empty() {
        return Err(RuleError::EmptyCards);
    }
    ensure_distinct(cards)?;
    Ok(detect(cards, trump))
}

/// Rejects a card list that holds the same physical card twice.
pub(crate) fn ensure_distinct(cards: &[Card]) -> Result<(), RuleError> {
    let mut seen = HashSet::with_capacity(cards.len());
    match cards.iter().find(|&&card| !seen.insert(card)) {
        Some(&card) => Err(RuleError::DuplicateCard(card)),
        None => Ok(()),
    }
}

pub(crate) fn detect(cards: &[Card], trump: TrumpInfo) -> Vec<Combo> {
    let buckets = bucket_by_key(cards, trump);

    let mut singles: Vec<(CardKey, Card)> = buckets
        .iter()
        .flat_map(|(key, bucket)| bucket.iter().map(move |&card| (*key, card)))
        .collect();
    singles.sort_by(|a, b| {
        a.0.strength()
            .cmp(&b.0.strength())
            .then(a.0.lane.cmp(&b.0.lane))
            .then(a.1.deck.cmp(&b.1.deck))
    });

    let mut pairs: Vec<(CardKey, [Card; 2])> = Vec::new();
    for (key, bucket) in &buckets {
        for chunk in bucket.chunks_exact(2) {
            pairs.push((*key, [chunk[0], chunk[1]]));
        }
    }
    pairs.sort_by(|a, b| {
        a.0.strength()
            .cmp(&b.0.strength())
            .then(a.0.lane.cmp(&b.0.lane))
    });

    let tractors = chain_pairs(&pairs);

    let mut combos = Vec::with_capacity(singles.len() + pairs.len() + tractors.len());
    combos.extend(
        singles
            .into_iter()
            .map(|(_, card)| build(ComboKind::Single, vec![card], trump)),
    );
    combos.extend(
        pairs
            .iter()
            .map(|(_, pair)| build(ComboKind::Pair, pair.to_vec(), trump)),
    );
    combos.extend(
        tractors
            .into_iter()
            .map(|cards| build(ComboKind::Tractor, cards, trump)),
    );
    combos
}

/// Shape of an arbitrary card list, or `None` if it is not a single combo.
pub fn classify_play(cards: &[Card], trump: TrumpInfo) -> Option<ComboKind> {
    let unique: HashSet<Card> = cards.iter().copied().collect();
    if unique.len() != cards.len() {
        return None;
    }

    match cards.len() {
        0 => None,
        1 => Some(ComboKind::Single),
        2 => (trump.key(cards[0]) == trump.key(cards[1])).then_some(ComboKind::Pair),
        len if len % 2 == 1 => None,
        len => {
            let buckets = bucket_by_key(cards, trump);
            if buckets.len() * 2 != len || buckets.values().any(|bucket| bucket.len() != 2) {
                return None;
            }
            let mut keys = buckets.keys();
            let first = *keys.next()?;
            if !first.lane.chains() {
                return None;
            }
            // BTreeMap keys iterate in (lane, order) order, so one lane means a sorted run.
            let mut previous = first;
            for key in keys {
                if key.lane != first.lane || key.order != previous.order + 1 {
                    return None;
                }
                previous = *key;
            }
            Some(ComboKind::Tractor)
        }
    }
}

fn bucket_by_key(cards: &[Card], trump: TrumpInfo) -> BTreeMap<CardKey, Vec<Card>> {
    let mut buckets: BTreeMap<CardKey, Vec<Card>> = BTreeMap::new();
    for &card in cards {
        buckets.entry(trump.key(card)).or_default().push(card);
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|card| card.deck);
    }
    buckets
}

/// Scan sorted pairs lane by lane and emit every run of two or more
/// consecutive pairs, sub-runs included.
fn chain_pairs(pairs: &[(CardKey, [Card; 2])]) -> Vec<Vec<Card>> {
    let mut lanes: BTreeMap<Lane, BTreeMap<u8, [Card; 2]>> = BTreeMap::new();
    for (key, pair) in pairs {
        if key.lane.chains() {
            lanes
                .entry(key.lane)
                .or_default()
                .entry(key.order)
                .or_insert(*pair);
        }
    }

    let mut runs: Vec<(usize, (u8, u8), Lane, Vec<Card>)> = Vec::new();
    for (lane, by_order) in &lanes {
        let ordered: Vec<(u8, [Card; 2])> = by_order.iter().map(|(o, p)| (*o, *p)).collect();
        let mut start = 0;
        while start < ordered.len() {
            let mut end = start;
            while end + 1 < ordered.len() && ordered[end + 1].0 == ordered[end].0 + 1 {
                end += 1;
            }
            let run = &ordered[start..=end];
            for from in 0..run.len() {
                for to in (from + 1)..run.len() {
                    let cards: Vec<Card> = run[from..=to]
                        .iter()
                        .flat_map(|(_, pair)| pair.iter().copied())
                        .collect();
                    let start_strength = (lane.tier(), run[from].0);
                    runs.push((to - from + 1, start_strength, *lane, cards));
                }
            }
            start = end + 1;
        }
    }

    runs.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    runs.into_iter().map(|(_, _, _, cards)| cards).collect()
}

fn build(kind: ComboKind, cards: Vec<Card>, trump: TrumpInfo) -> Combo {
    let value = trump.combo_value(&cards, ValueMode::Basic);
    Combo { kind, cards, value }
}

#[cfg(test)]
mod tests {
    use super::{classify_play, identify_combos};
    use crate::error::RuleError;
    use crate::model::card::{Card, Joker, parse_cards};
    use crate::model::combo::ComboKind;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::TrumpInfo;

    fn trump() -> TrumpInfo {
        TrumpInfo::new(Rank::Two, Suit::Spades)
    }

    fn count(combos: &[crate::model::combo::Combo], kind: ComboKind) -> usize {
        combos.iter().filter(|combo| combo.kind == kind).count()
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(identify_combos(&[], trump()), Err(RuleError::EmptyCards));
    }

    #[test]
    fn trump_ranks_of_different_suits_stay_single() {
        let hand = parse_cards("2H 2D").unwrap();
        let combos = identify_combos(&hand, trump()).unwrap();
        assert_eq!(count(&combos, ComboKind::Single), 2);
        assert_eq!(count(&combos, ComboKind::Pair), 0);
    }

    #[test]
    fn physical_copies_pair() {
        let hand = parse_cards("2H 2H#1").unwrap();
        let combos = identify_combos(&hand, trump()).unwrap();
        assert_eq!(count(&combos, ComboKind::Single), 2);
        assert_eq!(count(&combos, ComboKind::Pair), 1);
    }

    #[test]
    fn three_pair_run_yields_every_sub_tractor() {
        let hand = parse_cards("7H 7H#1 8H 8H#1 9H 9H#1").unwrap();
        let combos = identify_combos(&hand, trump()).unwrap();
        let tractors: Vec<usize> = combos
            .iter()
            .filter(|combo| combo.kind == ComboKind::Tractor)
            .map(|combo| combo.len())
            .collect();
        assert_eq!(tractors, vec![6, 4, 4]);
        assert_eq!(count(&combos, ComboKind::Pair), 3);
        assert_eq!(count(&combos, ComboKind::Single), 6);
    }

    #[test]
    fn tractor_bridges_the_trump_rank() {
        let trump = TrumpInfo::new(Rank::Five, Suit::Hearts);
        let hand = parse_cards("4C 4C#1 6C 6C#1").unwrap();
        let combos = identify_combos(&hand, trump).unwrap();
        assert_eq!(count(&combos, ComboKind::Tractor), 1);
    }

    #[test]
    fn gap_breaks_the_run() {
        let hand = parse_cards("7H 7H#1 9H 9H#1").unwrap();
        let combos = identify_combos(&hand, trump()).unwrap();
        assert_eq!(count(&combos, ComboKind::Tractor), 0);
    }

    #[test]
    fn jokers_form_their_own_step() {
        let small = Card::joker(Joker::Small);
        let big = Card::joker(Joker::Big);
        let hand = vec![small, small.copy(1), big, big.copy(1)];
        let combos = identify_combos(&hand, trump()).unwrap();
        let tractor = combos
            .iter()
            .find(|combo| combo.kind == ComboKind::Tractor)
            .expect("joker tractor");
        assert_eq!(tractor.cards, hand);
    }

    #[test]
    fn equal_length_tractors_start_low_first() {
        let hand = parse_cards("JD JD#1 QD QD#1 4C 4C#1 3C 3C#1").unwrap();
        let combos = identify_combos(&hand, trump()).unwrap();
        let first = combos
            .iter()
            .find(|combo| combo.kind == ComboKind::Tractor)
            .unwrap();
        assert_eq!(first.cards[0].rank(), Some(Rank::Three));
    }

    #[test]
    fn repeated_physical_card_is_rejected() {
        let hand = parse_cards("AH AH 3C").unwrap();
        assert_eq!(
            identify_combos(&hand, trump()),
            Err(RuleError::DuplicateCard(parse_cards("AH").unwrap()[0]))
        );
        let copies = parse_cards("AH AH#1").unwrap();
        assert!(identify_combos(&copies, trump()).is_ok());
    }

    #[test]
    fn classifies_arbitrary_selections() {
        let trump = trump();
        let classify = |text: &str| classify_play(&parse_cards(text).unwrap(), trump);
        assert_eq!(classify("AH"), Some(ComboKind::Single));
        assert_eq!(classify("AH AH#1"), Some(ComboKind::Pair));
        assert_eq!(classify("2H 2D"), None);
        assert_eq!(classify("AH AH"), None);
        assert_eq!(classify("3S 3S#1 4S 4S#1"), Some(ComboKind::Tractor));
        assert_eq!(classify("3S 3S#1 5S 5S#1"), None);
        assert_eq!(classify("AS AS#1 2H 2H#1"), None);
        assert_eq!(classify("AH KH"), None);
        assert_eq!(classify(""), None);
    }
}
