//! Decision audit harness: seeded self-play through the heuristic bots with
//! every decision checked for legality and timed against a budget.

pub mod audit;
pub mod config;
pub mod logging;
pub mod telemetry;
