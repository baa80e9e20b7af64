mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::{MemorySnapshot, PlayDecision};
use tractor_core::error::RuleError;
use tractor_core::model::card::Card;
use tractor_core::model::player::PlayerPosition;
use tractor_core::model::trick::Trick;
use tractor_core::model::trump::TrumpInfo;

/// Snapshot handed to a policy for one decision.
pub struct PolicyContext<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a [Card],
    pub trick: &'a Trick,
    pub trump: TrumpInfo,
    /// Whether `seat` sits on the team trying to collect points.
    pub attacking: bool,
    /// Points the attacking team has collected so far this round.
    pub attacker_points: u16,
    pub memory: Option<&'a MemorySnapshot>,
}

/// Interface for anything that picks plays for a seat.
pub trait Policy: Send {
    /// Choose the cards to lead or follow with.
    fn choose_play(&mut self, ctx: &PolicyContext<'_>) -> Result<PlayDecision, RuleError>;
}
