use super::{Policy, PolicyContext};
use crate::bot::{BotParams, GameContext, PlayDecision, PlayPlanner, PointPressure};
use tracing::{Level, event};
use tractor_core::error::RuleError;
use tractor_core::model::card::Card;

const DETAILS_ENV: &str = "TRACTOR_DECISION_DETAILS";

/// Policy backed by the rule-based planner.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPolicy {
    params: BotParams,
}

impl HeuristicPolicy {
    pub fn new(params: BotParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }
}

impl Policy for HeuristicPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext<'_>) -> Result<PlayDecision, RuleError> {
        let pressure = PointPressure::from_attacker_points(ctx.attacker_points);
        let mut game = GameContext::new(ctx.seat, ctx.trick, &self.params)
            .with_pressure(ctx.attacking, pressure);
        if let Some(memory) = ctx.memory {
            game = game.with_memory(memory);
        }

        let decision = PlayPlanner::decide(ctx.hand, ctx.trick, &game, ctx.trump)?;
        log_play_decision(ctx, &game, &decision);
        Ok(decision)
    }
}

fn decision_details_enabled() -> bool {
    details_flag(std::env::var(DETAILS_ENV).ok().as_deref())
}

fn details_flag(raw: Option<&str>) -> bool {
    raw.map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(false)
}

fn log_play_decision(ctx: &PolicyContext<'_>, game: &GameContext<'_>, decision: &PlayDecision) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let chosen = join_cards(&decision.cards);
    let hand = if decision_details_enabled() || ctx.hand.len() <= 6 {
        join_cards(ctx.hand)
    } else {
        format!("{} cards", ctx.hand.len())
    };

    if decision.decision_point.is_lead() {
        event!(
            target: "tractor_bot::lead",
            Level::INFO,
            seat = ?ctx.seat,
            decision_point = decision.decision_point.as_str(),
            scenario = decision.scenario,
            trick_position = game.position.as_str(),
            point_pressure = game.pressure.as_str(),
            attacking = game.attacking,
            trick_points = ctx.trick.points(),
            chosen = %chosen,
            candidate_count = decision.candidates,
            hand = %hand,
        );
    } else {
        event!(
            target: "tractor_bot::follow",
            Level::INFO,
            seat = ?ctx.seat,
            decision_point = decision.decision_point.as_str(),
            scenario = decision.scenario,
            trick_position = game.position.as_str(),
            point_pressure = game.pressure.as_str(),
            attacking = game.attacking,
            trick_points = ctx.trick.points(),
            chosen = %chosen,
            candidate_count = decision.candidates,
            hand = %hand,
        );
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
