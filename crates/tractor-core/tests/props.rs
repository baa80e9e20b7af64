use proptest::prelude::*;
use tractor_core::{
    Card, Joker, Rank, Suit, TrumpInfo, analyze_suit_availability, identify_combos, is_valid_play,
};

fn card(max_rank: u8) -> impl Strategy<Value = Card> {
    prop_oneof![
        12 => (0usize..4, 2u8..=max_rank, 0u8..2).prop_map(|(suit, rank, deck)| {
            Card::new(
                Rank::from_value(rank).unwrap(),
                Suit::from_index(suit).unwrap(),
            )
            .copy(deck)
        }),
        1 => (any::<bool>(), 0u8..2).prop_map(|(big, deck)| {
            let joker = if big { Joker::Big } else { Joker::Small };
            Card::joker(joker).copy(deck)
        }),
    ]
}

/// Narrow rank range so generated hands are dense in pairs and runs.
fn hand_cards() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::hash_set(card(8), 1..24).prop_map(|set| set.into_iter().collect())
}

fn trump_info() -> impl Strategy<Value = TrumpInfo> {
    (2u8..=14, proptest::option::of(0usize..4)).prop_map(|(rank, suit)| TrumpInfo {
        rank: Rank::from_value(rank).unwrap(),
        suit: suit.and_then(Suit::from_index),
    })
}

proptest! {
    /// Every detected combo can be led from the hand it came from.
    #[test]
    fn detected_combos_are_legal_leads(hand in hand_cards(), trump in trump_info()) {
        let combos = identify_combos(&hand, trump).unwrap();
        prop_assert!(combos.len() >= hand.len());
        for combo in &combos {
            prop_assert!(
                is_valid_play(&combo.cards, None, &hand, trump).unwrap(),
                "{} should be a legal lead", combo
            );
        }
    }

    /// Hand order never changes the follow scenario.
    #[test]
    fn scenario_ignores_hand_order(
        (hand, shuffled) in hand_cards().prop_flat_map(|hand| (Just(hand.clone()), Just(hand).prop_shuffle())),
        lead_source in hand_cards(),
        trump in trump_info(),
    ) {
        let leads = identify_combos(&lead_source, trump).unwrap();
        let lead = &leads[leads.len() - 1].cards;

        let first = analyze_suit_availability(lead, &hand, trump).unwrap();
        let second = analyze_suit_availability(lead, &shuffled, trump).unwrap();
        prop_assert_eq!(first.scenario.label(), second.scenario.label());
        prop_assert_eq!(first.available.len(), second.available.len());
        if let (
            tractor_core::Scenario::ValidCombos { candidates: a },
            tractor_core::Scenario::ValidCombos { candidates: b },
        ) = (&first.scenario, &second.scenario)
        {
            prop_assert_eq!(a.len(), b.len());
        }
    }

    /// Any same-length selection is legal once the hand is void in the led group.
    #[test]
    fn void_hands_may_play_anything(hand in hand_cards(), trump in trump_info()) {
        let lead = vec![Card::joker(Joker::Big).copy(0)];
        let non_trump: Vec<Card> = hand.iter().copied().filter(|&card| !trump.is_trump(card)).collect();
        prop_assume!(!non_trump.is_empty());
        for card in &non_trump {
            prop_assert!(is_valid_play(&[*card], Some(&lead), &non_trump, trump).unwrap());
        }
    }
}
