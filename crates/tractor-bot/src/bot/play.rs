use super::lead::choose_lead;
use super::route::route_with_trace;
use super::{DecisionPoint, GameContext};
use tracing::{Level, event};
use tractor_core::error::RuleError;
use tractor_core::model::card::Card;
use tractor_core::model::trick::Trick;
use tractor_core::model::trump::TrumpInfo;
use tractor_core::rules::availability::{Scenario, analyze_suit_availability};
use tractor_core::rules::detect::identify_combos;
use tractor_core::rules::validate::is_valid_play;

/// Upper bound on selections tried by the legality guard.
const SEARCH_LIMIT: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayDecision {
    pub cards: Vec<Card>,
    pub decision_point: DecisionPoint,
    /// Follow scenario label, or `"lead"`.
    pub scenario: &'static str,
    /// Options the deciding branch had to choose from.
    pub candidates: usize,
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Decide what `ctx.seat` plays into `trick`.
    ///
    /// The result is always a legal play. A router choice that fails the
    /// validator is logged and replaced by a bounded search, then by the
    /// first cards in hand.
    pub fn decide(
        hand: &[Card],
        trick: &Trick,
        ctx: &GameContext<'_>,
        trump: TrumpInfo,
    ) -> Result<PlayDecision, RuleError> {
        if hand.is_empty() {
            return Err(RuleError::EmptyHand);
        }

        let lead = trick.lead();
        let (cards, decision_point, scenario, candidates) = match lead {
            None => {
                let (cards, point) = choose_lead(hand, ctx, trump)?;
                let options = identify_combos(hand, trump)?.len();
                (cards, point, "lead", options)
            }
            Some(lead) => {
                let availability = analyze_suit_availability(lead, hand, trump)?;
                let (cards, point) = route_with_trace(&availability, hand, ctx, trump, trick);
                let options = match &availability.scenario {
                    Scenario::ValidCombos { candidates } => candidates.len(),
                    Scenario::Void => hand.len(),
                    _ => availability.available.len(),
                };
                (cards, point, availability.scenario.label(), options)
            }
        };

        if is_valid_play(&cards, lead, hand, trump)? {
            return Ok(PlayDecision {
                cards,
                decision_point,
                scenario,
                candidates,
            });
        }

        event!(
            target: "tractor_bot::guard",
            Level::ERROR,
            seat = ?ctx.seat,
            decision_point = decision_point.as_str(),
            scenario,
            rejected = %format_cards(&cards),
        );

        let needed = lead.map_or(1, <[Card]>::len).min(hand.len());
        if let Some(found) = search_legal(hand, lead, needed, trump)? {
            return Ok(PlayDecision {
                cards: found,
                decision_point: DecisionPoint::GuardSearch,
                scenario,
                candidates,
            });
        }

        Ok(PlayDecision {
            cards: hand[..needed].to_vec(),
            decision_point: DecisionPoint::GuardEmergency,
            scenario,
            candidates,
        })
    }
}

/// Try `needed`-card selections in hand order until one is legal.
fn search_legal(
    hand: &[Card],
    lead: Option<&[Card]>,
    needed: usize,
    trump: TrumpInfo,
) -> Result<Option<Vec<Card>>, RuleError> {
    if needed == 0 || needed > hand.len() {
        return Ok(None);
    }

    let mut indices: Vec<usize> = (0..needed).collect();
    for _ in 0..SEARCH_LIMIT {
        let selection: Vec<Card> = indices.iter().map(|&idx| hand[idx]).collect();
        if is_valid_play(&selection, lead, hand, trump)? {
            return Ok(Some(selection));
        }
        if !advance(&mut indices, hand.len()) {
            break;
        }
    }
    Ok(None)
}

/// Step to the next combination in lexicographic order.
fn advance(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let Some(pos) = (0..k).rev().find(|&pos| indices[pos] < n - k + pos) else {
        return false;
    };
    indices[pos] += 1;
    for next in pos + 1..k {
        indices[next] = indices[next - 1] + 1;
    }
    true
}

pub(crate) fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
