pub mod bot;
pub mod policy;

pub use bot::{
    BotParams, DecisionPoint, GameContext, MemorySnapshot, PlayDecision, PlayPlanner,
    PointPressure, RouteError, TrickAnalysis, TrickPosition, route_decision, route_with_trace,
};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
