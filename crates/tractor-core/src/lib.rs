#![deny(warnings)]
pub mod error;
pub mod model;
pub mod rules;

pub use error::RuleError;
pub use model::card::{Card, Face, Joker};
pub use model::combo::{Combo, ComboKind};
pub use model::player::PlayerPosition;
pub use model::rank::Rank;
pub use model::suit::Suit;
pub use model::trick::{Trick, TrickError, TrickPlay};
pub use model::trump::{CardKey, Lane, SuitGroup, TrumpInfo};
pub use rules::availability::{LeadShape, Scenario, SuitAvailability, analyze_suit_availability};
pub use rules::detect::{classify_play, identify_combos};
pub use rules::validate::is_valid_play;
pub use rules::value::ValueMode;

pub struct EngineInfo;

impl EngineInfo {
    pub const fn name() -> &'static str {
        "tractor"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::EngineInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(EngineInfo::name(), "tractor");
        assert!(!EngineInfo::version().is_empty());
    }
}
