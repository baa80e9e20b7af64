use crate::model::card::Card;
use thiserror::Error;

/// Malformed input handed to the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("hand is empty")]
    EmptyHand,
    #[error("leading play has no cards")]
    EmptyLead,
    #[error("no cards to inspect")]
    EmptyCards,
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}
