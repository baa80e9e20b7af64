use crate::error::RuleError;
use crate::model::card::Card;
use crate::model::trump::TrumpInfo;
use crate::rules::availability::{Scenario, analyze_suit_availability};
use crate::rules::detect::{classify_play, ensure_distinct};

/// Whether `selection` is a legal play from `hand`.
///
/// With no lead, any self-consistent combo may be led. Otherwise legality
/// depends on how the hand can follow the lead.
pub fn is_valid_play(
    selection: &[Card],
    lead: Option<&[Card]>,
    hand: &[Card],
    trump: TrumpInfo,
) -> Result<bool, RuleError> {
    if hand.is_empty() {
        return Err(RuleError::EmptyHand);
    }
    ensure_distinct(hand)?;
    if selection.is_empty() || !drawn_from(selection, hand) {
        return Ok(false);
    }

    let Some(lead) = lead else {
        return Ok(classify_play(selection, trump).is_some());
    };

    let availability = analyze_suit_availability(lead, hand, trump)?;
    if selection.len() != availability.required_len() {
        return Ok(false);
    }

    let legal = match &availability.scenario {
        Scenario::Void => true,
        Scenario::Insufficient => availability
            .available
            .iter()
            .all(|card| selection.contains(card)),
        Scenario::ValidCombos { candidates } => candidates
            .iter()
            .any(|candidate| candidate.same_cards(selection)),
        Scenario::EnoughRemaining => selection
            .iter()
            .all(|card| availability.available.contains(card)),
    };
    Ok(legal)
}

/// Every selected card is a distinct physical card held in `hand`.
fn drawn_from(selection: &[Card], hand: &[Card]) -> bool {
    selection
        .iter()
        .enumerate()
        .all(|(idx, card)| hand.contains(card) && !selection[..idx].contains(card))
}
