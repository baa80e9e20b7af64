use super::select::{Direction, disposal_order, select_cards, select_combos};
use super::{DecisionPoint, GameContext, TrickAnalysis};
use thiserror::Error;
use tracing::{Level, event};
use tractor_core::model::card::Card;
use tractor_core::model::combo::Combo;
use tractor_core::model::trick::Trick;
use tractor_core::model::trump::TrumpInfo;
use tractor_core::rules::availability::{Scenario, SuitAvailability};
use tractor_core::rules::detect::identify_combos;
use tractor_core::rules::hierarchy::beats;
use tractor_core::rules::value::ValueMode;

/// Faults inside the router. They never leave [`route_with_trace`]; the
/// router degrades to a conservative play instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("trick has no current winner")]
    MissingWinner,
    #[error("need {needed} cards but hand holds {held}")]
    NotEnoughCards { needed: usize, held: usize },
    #[error("scenario offered no candidates")]
    NoCandidates,
}

type Routed = Result<(Vec<Card>, DecisionPoint), RouteError>;

/// Cards to play when following `trick`.
pub fn route_decision(
    availability: &SuitAvailability,
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    trick: &Trick,
) -> Vec<Card> {
    route_with_trace(availability, hand, ctx, trump, trick).0
}

/// [`route_decision`] plus the branch that made the choice.
pub fn route_with_trace(
    availability: &SuitAvailability,
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    trick: &Trick,
) -> (Vec<Card>, DecisionPoint) {
    match route(availability, hand, ctx, trump, trick) {
        Ok(routed) => routed,
        Err(err) => {
            event!(
                target: "tractor_bot::route",
                Level::WARN,
                seat = ?ctx.seat,
                scenario = availability.scenario.label(),
                error = %err,
            );
            fallback(availability, hand, trump)
        }
    }
}

fn route(
    availability: &SuitAvailability,
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    trick: &Trick,
) -> Routed {
    let needed = availability.required_len();
    if hand.len() < needed {
        return Err(RouteError::NotEnoughCards {
            needed,
            held: hand.len(),
        });
    }
    let analysis = TrickAnalysis::of(trick, ctx.seat, trump).ok_or(RouteError::MissingWinner)?;

    match &availability.scenario {
        Scenario::ValidCombos { candidates } if availability.lead.is_trump() => {
            follow_trump_lead(candidates, ctx, trump, &analysis)
        }
        Scenario::ValidCombos { candidates } => {
            follow_suit_lead(candidates, availability, hand, ctx, trump, trick, &analysis)
        }
        Scenario::EnoughRemaining => Ok(enough_remaining(availability, hand, ctx, trump, &analysis)),
        Scenario::Void => void(availability, hand, ctx, trump, &analysis),
        Scenario::Insufficient => insufficient(availability, hand, trump),
    }
}

fn follow_trump_lead(
    candidates: &[Combo],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    analysis: &TrickAnalysis,
) -> Routed {
    let params = ctx.params;
    if let [only] = candidates {
        return Ok((only.cards.clone(), DecisionPoint::OnlyCandidate));
    }

    let teammate_value = trump.combo_value(&analysis.winning_cards, ValueMode::Strategic);
    if analysis.is_teammate && (ctx.is_last() || teammate_value > params.strong_combo_value) {
        let pick = lowest(candidates, ValueMode::Contribute, trump)?;
        return Ok((pick, DecisionPoint::TrumpContribute));
    }

    let beating: Vec<Combo> = candidates
        .iter()
        .filter(|combo| beats(&combo.cards, &analysis.winning_cards, trump))
        .cloned()
        .collect();
    if !beating.is_empty() {
        let threshold = params.beat_threshold(analysis.points);
        let low_trick = analysis.points < params.point_trick;
        let qualifying: Vec<Combo> = beating
            .iter()
            .filter(|combo| {
                combo.value > threshold
                    && (!low_trick || top_rank_below(combo, params.low_trick_rank_cap, trump))
            })
            .cloned()
            .collect();
        let pool = if qualifying.is_empty() {
            &beating
        } else {
            &qualifying
        };
        let pick = lowest(pool, ValueMode::Basic, trump)?;
        return Ok((pick, DecisionPoint::TrumpBeat));
    }

    let pick = lowest(candidates, ValueMode::Strategic, trump)?;
    Ok((pick, DecisionPoint::TrumpDispose))
}

fn follow_suit_lead(
    candidates: &[Combo],
    availability: &SuitAvailability,
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    trick: &Trick,
    analysis: &TrickAnalysis,
) -> Routed {
    if let [only] = candidates {
        return Ok((only.cards.clone(), DecisionPoint::OnlyCandidate));
    }

    if analysis.is_teammate {
        let visible: Vec<Card> = trick.cards().copied().collect();
        let secure = analysis.trumped_in
            || ctx.memory.is_some_and(|memory| {
                memory.is_biggest_remaining(&analysis.winning_cards, hand, &visible, trump)
            });
        if secure && !ctx.next_seat_void(availability.lead.group) {
            let pick = lowest(candidates, ValueMode::Contribute, trump)?;
            return Ok((pick, DecisionPoint::SuitContribute));
        }
    }

    if !analysis.is_teammate && !analysis.trumped_in {
        let beating: Vec<Combo> = candidates
            .iter()
            .filter(|combo| beats(&combo.cards, &analysis.winning_cards, trump))
            .cloned()
            .collect();
        if !beating.is_empty() {
            let pick = select_combos(&beating, ValueMode::Basic, Direction::Highest, 1, trump)
                .into_iter()
                .next()
                .ok_or(RouteError::NoCandidates)?;
            return Ok((pick.cards, DecisionPoint::SuitBeat));
        }
    }

    let pointless: Vec<Combo> = candidates
        .iter()
        .filter(|combo| combo.points() == 0)
        .cloned()
        .collect();
    let pool = if pointless.is_empty() {
        candidates
    } else {
        pointless.as_slice()
    };
    let pick = lowest(pool, ValueMode::Strategic, trump)?;
    Ok((pick, DecisionPoint::SuitDispose))
}

fn enough_remaining(
    availability: &SuitAvailability,
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    analysis: &TrickAnalysis,
) -> (Vec<Card>, DecisionPoint) {
    let needed = availability.required_len();
    if analysis.is_teammate && worth_feeding(analysis.points, hand.len(), ctx) {
        let pick = select_cards(
            &availability.available,
            ValueMode::Contribute,
            Direction::Lowest,
            needed,
            trump,
        );
        return (pick, DecisionPoint::RemainingContribute);
    }

    let mut pick = disposal_order(&availability.available, trump);
    pick.truncate(needed);
    (pick, DecisionPoint::RemainingDispose)
}

/// Contribute ladder for a trick the teammate already holds.
fn worth_feeding(trick_points: u16, hand_len: usize, ctx: &GameContext<'_>) -> bool {
    let params = ctx.params;
    trick_points >= params.contribute_high_points
        || (trick_points >= params.contribute_medium_points && hand_len <= params.few_cards)
        || (trick_points >= params.contribute_medium_points && ctx.pressure.is_elevated())
        || (trick_points > 0 && hand_len <= params.very_few_cards)
}

fn void(
    availability: &SuitAvailability,
    hand: &[Card],
    ctx: &GameContext<'_>,
    trump: TrumpInfo,
    analysis: &TrickAnalysis,
) -> Routed {
    let needed = availability.required_len();
    let trumps: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|&card| trump.is_trump(card))
        .collect();

    if analysis.is_teammate && (ctx.is_last() || analysis.trumped_in) {
        let plain: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|&card| !trump.is_trump(card))
            .collect();
        let pool = if plain.len() >= needed {
            plain.as_slice()
        } else {
            hand
        };
        let pick = select_cards(pool, ValueMode::Contribute, Direction::Lowest, needed, trump);
        return Ok((pick, DecisionPoint::VoidContribute));
    }

    let options = ruff_options(&trumps, availability, analysis, trump);
    if availability.lead.is_trump() || options.is_empty() {
        return Ok(dispose_from(hand, needed, trump));
    }

    let params = ctx.params;
    let points = analysis.points;
    let mut ranked = select_combos(&options, ValueMode::Basic, Direction::Lowest, options.len(), trump);

    if ctx.next_seat_void(availability.lead.group) {
        if points >= params.ruff_high_points {
            let pick = ranked.pop().ok_or(RouteError::NoCandidates)?;
            return Ok((pick.cards, DecisionPoint::RuffStrongest));
        }
        if points >= params.ruff_medium_points {
            let pick = ranked
                .iter()
                .find(|combo| combo.value > params.face_trump_floor)
                .or(ranked.last())
                .ok_or(RouteError::NoCandidates)?;
            return Ok((pick.cards.clone(), DecisionPoint::RuffFace));
        }
    } else if points > 0 {
        if let Some(pick) = ranked.iter().find(|combo| combo.points() > 0) {
            return Ok((pick.cards.clone(), DecisionPoint::RuffPoints));
        }
        let pick = ranked
            .get(ranked.len() / 2)
            .ok_or(RouteError::NoCandidates)?;
        return Ok((pick.cards.clone(), DecisionPoint::RuffMiddle));
    }

    let pick = ranked.into_iter().next().ok_or(RouteError::NoCandidates)?;
    Ok((pick.cards, DecisionPoint::RuffWeakest))
}

/// Trump plays of the lead's shape that take the trick from its current winner.
fn ruff_options(
    trumps: &[Card],
    availability: &SuitAvailability,
    analysis: &TrickAnalysis,
    trump: TrumpInfo,
) -> Vec<Combo> {
    let Ok(combos) = identify_combos(trumps, trump) else {
        return Vec::new();
    };
    combos
        .into_iter()
        .filter(|combo| {
            combo.kind == availability.lead.kind
                && combo.len() == availability.lead.len
                && beats(&combo.cards, &analysis.winning_cards, trump)
        })
        .collect()
}

fn insufficient(availability: &SuitAvailability, hand: &[Card], trump: TrumpInfo) -> Routed {
    let needed = availability.required_len();
    let rest: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| !availability.available.contains(card))
        .collect();
    let fill = needed.saturating_sub(availability.available.len());
    if rest.len() < fill {
        return Err(RouteError::NotEnoughCards {
            needed,
            held: hand.len(),
        });
    }

    let mut pick = availability.available.clone();
    pick.extend(disposal_order(&rest, trump).into_iter().take(fill));
    Ok((pick, DecisionPoint::InsufficientFill))
}

fn dispose_from(cards: &[Card], needed: usize, trump: TrumpInfo) -> (Vec<Card>, DecisionPoint) {
    let mut pick = disposal_order(cards, trump);
    pick.truncate(needed);
    (pick, DecisionPoint::VoidDispose)
}

fn lowest(combos: &[Combo], mode: ValueMode, trump: TrumpInfo) -> Result<Vec<Card>, RouteError> {
    select_combos(combos, mode, Direction::Lowest, 1, trump)
        .into_iter()
        .next()
        .map(|combo| combo.cards)
        .ok_or(RouteError::NoCandidates)
}

/// Jokers have no rank and never count as a cheap trump.
fn top_rank_below(combo: &Combo, cap: u8, trump: TrumpInfo) -> bool {
    combo
        .cards
        .iter()
        .max_by_key(|&&card| trump.key(card).strength())
        .and_then(|card| card.rank())
        .is_some_and(|rank| rank.value() < cap)
}

/// Conservative play once routing has failed: the selector's disposal
/// ranking, or the first cards in hand.
fn fallback(
    availability: &SuitAvailability,
    hand: &[Card],
    trump: TrumpInfo,
) -> (Vec<Card>, DecisionPoint) {
    let needed = availability.required_len().min(hand.len());
    let pick = match &availability.scenario {
        Scenario::ValidCombos { candidates } => lowest(candidates, ValueMode::Strategic, trump).ok(),
        Scenario::EnoughRemaining => {
            let mut pick = disposal_order(&availability.available, trump);
            pick.truncate(needed);
            Some(pick)
        }
        Scenario::Insufficient => insufficient(availability, hand, trump)
            .ok()
            .map(|(cards, _)| cards),
        Scenario::Void => Some(dispose_from(hand, needed, trump).0),
    };
    match pick {
        Some(cards) if cards.len() == needed => (cards, DecisionPoint::FallbackDispose),
        _ => (hand[..needed].to_vec(), DecisionPoint::FallbackFirstCards),
    }
}
