use tractor_core::model::card::parse_cards;
use tractor_core::{
    Card, ComboKind, Rank, Scenario, Suit, TrumpInfo, analyze_suit_availability, identify_combos,
    is_valid_play,
};

fn trump() -> TrumpInfo {
    TrumpInfo::new(Rank::Two, Suit::Spades)
}

fn cards(text: &str) -> Vec<Card> {
    parse_cards(text).expect("valid card notation")
}

fn count(combos: &[tractor_core::Combo], kind: ComboKind) -> usize {
    combos.iter().filter(|combo| combo.kind == kind).count()
}

#[test]
fn off_suit_trump_ranks_stay_single() {
    let combos = identify_combos(&cards("2H 2D"), trump()).unwrap();
    assert_eq!(count(&combos, ComboKind::Single), 2);
    assert_eq!(count(&combos, ComboKind::Pair), 0);
}

#[test]
fn copies_of_one_trump_rank_card_pair() {
    let combos = identify_combos(&cards("2H 2H#1"), trump()).unwrap();
    assert_eq!(count(&combos, ComboKind::Single), 2);
    assert_eq!(count(&combos, ComboKind::Pair), 1);
}

#[test]
fn three_pair_run_yields_every_sub_tractor() {
    let combos = identify_combos(&cards("7H 7H#1 8H 8H#1 9H 9H#1"), trump()).unwrap();
    let lengths: Vec<usize> = combos
        .iter()
        .filter(|combo| combo.kind == ComboKind::Tractor)
        .map(|combo| combo.len())
        .collect();
    assert_eq!(lengths, vec![6, 4, 4]);
    assert_eq!(count(&combos, ComboKind::Pair), 3);
}

#[test]
fn jokers_chain_only_with_each_other() {
    let combos = identify_combos(&cards("AS AS#1 BJ BJ#1 SJ SJ#1"), trump()).unwrap();
    let tractors: Vec<_> = combos
        .iter()
        .filter(|combo| combo.kind == ComboKind::Tractor)
        .collect();
    assert_eq!(tractors.len(), 1);
    assert!(tractors[0].cards.iter().all(|card| card.is_joker()));
}

#[test]
fn off_suit_pair_cannot_replace_led_suit_pair() {
    let lead = cards("9H 9H#1");
    let hand = cards("4H 4H#1 6C 6C#1 KD");
    assert!(!is_valid_play(&cards("6C 6C#1"), Some(&lead), &hand, trump()).unwrap());
    assert!(is_valid_play(&cards("4H 4H#1"), Some(&lead), &hand, trump()).unwrap());
}

#[test]
fn must_exhaust_the_led_suit() {
    let lead = cards("7H 7H#1 8H 8H#1");
    let hand = cards("3H QH 4C 5C 9D JD");
    let availability = analyze_suit_availability(&lead, &hand, trump()).unwrap();
    assert_eq!(availability.scenario, Scenario::Insufficient);

    assert!(is_valid_play(&cards("3H QH 4C 9D"), Some(&lead), &hand, trump()).unwrap());
    assert!(!is_valid_play(&cards("3H 4C 5C 9D"), Some(&lead), &hand, trump()).unwrap());
    assert!(!is_valid_play(&cards("QH 4C 5C 9D"), Some(&lead), &hand, trump()).unwrap());
    assert!(!is_valid_play(&cards("3H QH 4C"), Some(&lead), &hand, trump()).unwrap());
}

#[test]
fn singles_may_follow_a_pair_once_no_pair_remains() {
    let lead = cards("9H 9H#1");
    let hand = cards("3H 5H KD KD#1");
    let availability = analyze_suit_availability(&lead, &hand, trump()).unwrap();
    assert_eq!(availability.scenario, Scenario::EnoughRemaining);
    assert!(is_valid_play(&cards("3H 5H"), Some(&lead), &hand, trump()).unwrap());
    assert!(!is_valid_play(&cards("KD KD#1"), Some(&lead), &hand, trump()).unwrap());
}

#[test]
fn trump_lead_draws_every_trump_in_hand() {
    let lead = cards("3S");
    let hand = cards("2H SJ 4C");
    let availability = analyze_suit_availability(&lead, &hand, trump()).unwrap();
    assert_eq!(availability.available.len(), 2);
    assert!(is_valid_play(&cards("2H"), Some(&lead), &hand, trump()).unwrap());
    assert!(!is_valid_play(&cards("4C"), Some(&lead), &hand, trump()).unwrap());
}

#[test]
fn no_trump_suit_round_keeps_suits_plain() {
    let trump = TrumpInfo::no_suit(Rank::Five);
    let combos = identify_combos(&cards("4S 4S#1 6S 6S#1"), trump).unwrap();
    assert_eq!(count(&combos, ComboKind::Tractor), 1);
    assert!(!trump.is_trump(cards("AS")[0]));
}
