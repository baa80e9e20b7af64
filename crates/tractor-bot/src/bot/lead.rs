use super::select::{Direction, select_combos};
use super::{DecisionPoint, GameContext};
use tractor_core::error::RuleError;
use tractor_core::model::card::Card;
use tractor_core::model::combo::{Combo, ComboKind};
use tractor_core::model::rank::Rank;
use tractor_core::model::trump::TrumpInfo;
use tractor_core::rules::detect::identify_combos;
use tractor_core::rules::value::ValueMode;

/// Pick a leading play from `hand`.
///
/// Long plain tractors go first, then plain combos nobody can beat, then the
/// cheapest pointless plain single, and trump only when nothing plain fits.
pub fn choose_lead(
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
) -> Result<(Vec<Card>, DecisionPoint), RuleError> {
    let combos = identify_combos(hand, trump)?;
    let plain = |combo: &&Combo| combo.cards.iter().all(|&card| !trump.is_trump(card));

    // Combos come longest tractor first, lowest start among equals.
    if let Some(tractor) = combos
        .iter()
        .filter(plain)
        .find(|combo| combo.kind == ComboKind::Tractor)
    {
        return Ok((tractor.cards.clone(), DecisionPoint::LeadTractor));
    }

    if let Some(memory) = ctx.memory {
        let safe_pairs: Vec<Combo> = combos
            .iter()
            .filter(plain)
            .filter(|combo| combo.kind == ComboKind::Pair)
            .filter(|combo| memory.is_biggest_remaining(&combo.cards, hand, &[], trump))
            .cloned()
            .collect();
        if let Some(pair) = select_combos(&safe_pairs, ValueMode::Basic, Direction::Highest, 1, trump)
            .into_iter()
            .next()
        {
            return Ok((pair.cards, DecisionPoint::LeadBiggestPair));
        }
    }

    let singles: Vec<&Combo> = combos
        .iter()
        .filter(|combo| combo.kind == ComboKind::Single)
        .collect();

    let biggest = singles.iter().copied().filter(plain).find(|combo| {
        let card = combo.cards[0];
        card.rank() == Some(Rank::Ace)
            || ctx
                .memory
                .is_some_and(|memory| memory.is_biggest_remaining(&combo.cards, hand, &[], trump))
    });
    if let Some(single) = biggest {
        return Ok((single.cards.clone(), DecisionPoint::LeadBiggestSingle));
    }

    let cheapest = |pool: Vec<&Combo>| {
        pool.into_iter()
            .min_by_key(|combo| trump.combo_value(&combo.cards, ValueMode::Strategic))
            .map(|combo| combo.cards.clone())
    };

    let low_plain: Vec<&Combo> = singles
        .iter()
        .copied()
        .filter(|combo| !trump.is_trump(combo.cards[0]) && combo.points() == 0)
        .collect();
    if let Some(cards) = cheapest(low_plain) {
        return Ok((cards, DecisionPoint::LeadLowSingle));
    }

    let low_trump: Vec<&Combo> = singles
        .iter()
        .copied()
        .filter(|combo| trump.is_trump(combo.cards[0]))
        .collect();
    if let Some(cards) = cheapest(low_trump) {
        return Ok((cards, DecisionPoint::LeadTrumpSingle));
    }

    // Only plain point cards are left.
    cheapest(singles)
        .map(|cards| (cards, DecisionPoint::LeadLowSingle))
        .ok_or(RuleError::EmptyHand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{BotParams, MemorySnapshot};
    use tractor_core::model::card::parse_cards;
    use tractor_core::model::player::PlayerPosition;
    use tractor_core::model::suit::Suit;
    use tractor_core::model::trick::Trick;

    fn trump() -> TrumpInfo {
        TrumpInfo::new(Rank::Two, Suit::Spades)
    }

    fn cards(text: &str) -> Vec<Card> {
        parse_cards(text).unwrap()
    }

    fn lead(hand: &str, memory: Option<&MemorySnapshot>) -> (Vec<Card>, DecisionPoint) {
        let params = BotParams::default();
        let trick = Trick::new(PlayerPosition::North);
        let mut ctx = GameContext::new(PlayerPosition::North, &trick, &params);
        if let Some(memory) = memory {
            ctx = ctx.with_memory(memory);
        }
        choose_lead(&cards(hand), &ctx, trump()).unwrap()
    }

    #[test]
    fn longest_plain_tractor_leads() {
        let (pick, point) = lead("3H 3H#1 4H 4H#1 9D 9D#1 10D 10D#1 JD JD#1 AS", None);
        assert_eq!(point, DecisionPoint::LeadTractor);
        assert_eq!(pick, cards("9D 9D#1 10D 10D#1 JD JD#1"));
    }

    #[test]
    fn trump_tractor_is_held_back() {
        let (pick, point) = lead("3S 3S#1 4S 4S#1 7C", None);
        assert_eq!(point, DecisionPoint::LeadLowSingle);
        assert_eq!(pick, cards("7C"));
    }

    #[test]
    fn verified_pair_leads_with_memory() {
        let mut memory = MemorySnapshot::new();
        memory.record_play(PlayerPosition::East, &cards("AD"), None, trump());
        let (pick, point) = lead("KD KD#1 4C 8C", Some(&memory));
        assert_eq!(point, DecisionPoint::LeadBiggestPair);
        assert_eq!(pick, cards("KD KD#1"));
    }

    #[test]
    fn ace_leads_before_low_cards() {
        let (pick, point) = lead("AC 4C 8H", None);
        assert_eq!(point, DecisionPoint::LeadBiggestSingle);
        assert_eq!(pick, cards("AC"));
    }

    #[test]
    fn cheapest_pointless_single_otherwise() {
        let (pick, point) = lead("KC 5H 8H 6D", None);
        assert_eq!(point, DecisionPoint::LeadLowSingle);
        assert_eq!(pick, cards("6D"));
    }

    #[test]
    fn trump_single_when_plain_cards_carry_points() {
        let (pick, point) = lead("KC 10H 5S BJ", None);
        assert_eq!(point, DecisionPoint::LeadTrumpSingle);
        assert_eq!(pick, cards("5S"));
    }

    #[test]
    fn point_cards_only_lead_the_cheapest() {
        let (pick, point) = lead("KC 10H", None);
        assert_eq!(point, DecisionPoint::LeadLowSingle);
        assert_eq!(pick, cards("10H"));
    }
}
