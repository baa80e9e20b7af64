use crate::error::RuleError;
use crate::model::card::Card;
use crate::model::combo::{Combo, ComboKind};
use crate::model::suit::Suit;
use crate::model::trump::{SuitGroup, TrumpInfo};
use crate::rules::detect::{classify_play, detect, ensure_distinct};
use core::fmt;

/// What the leading play demands from followers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadShape {
    pub group: SuitGroup,
    pub kind: ComboKind,
    pub len: usize,
}

impl LeadShape {
    pub fn of(lead: &[Card], trump: TrumpInfo) -> Result<Self, RuleError> {
        let first = *lead.first().ok_or(RuleError::EmptyLead)?;
        let group = trump.group(first);
        let kind = classify_play(lead, trump).unwrap_or(match lead.len() {
            1 => ComboKind::Single,
            2 => ComboKind::Pair,
            _ => ComboKind::Tractor,
        });
        Ok(Self {
            group,
            kind,
            len: lead.len(),
        })
    }

    pub const fn is_trump(&self) -> bool {
        self.group.is_trump()
    }

    /// The plain suit that was led, `None` for a trump lead.
    pub const fn leading_suit(&self) -> Option<Suit> {
        match self.group {
            SuitGroup::Plain(suit) => Some(suit),
            SuitGroup::Trump => None,
        }
    }

    /// Strict structural match. Pairs found inside a tractor are separate
    /// pair combos, which is how a tractor can answer a pair lead.
    fn accepts(&self, combo: &Combo) -> bool {
        combo.len() == self.len && combo.kind == self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// Structurally matching plays exist; one of them must be played.
    ValidCombos { candidates: Vec<Combo> },
    /// Enough cards in the group but no matching structure.
    EnoughRemaining,
    /// Nothing left in the group.
    Void,
    /// Some cards in the group, fewer than the lead length.
    Insufficient,
}

impl Scenario {
    pub const fn label(&self) -> &'static str {
        match self {
            Scenario::ValidCombos { .. } => "valid_combos",
            Scenario::EnoughRemaining => "enough_remaining",
            Scenario::Void => "void",
            Scenario::Insufficient => "insufficient",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitAvailability {
    pub lead: LeadShape,
    /// Hand cards in the led group, in hand order.
    pub available: Vec<Card>,
    pub scenario: Scenario,
}

impl SuitAvailability {
    pub fn required_len(&self) -> usize {
        self.lead.len
    }
}

/// Classify how `hand` can follow `lead`.
pub fn analyze_suit_availability(
    lead: &[Card],
    hand: &[Card],
    trump: TrumpInfo,
) -> Result<SuitAvailability, RuleError> {
    if hand.is_empty() {
        return Err(RuleError::EmptyHand);
    }
    ensure_distinct(hand)?;
    let shape = LeadShape::of(lead, trump)?;

    let available: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|&card| trump.group(card) == shape.group)
        .collect();

    let scenario = if available.is_empty() {
        Scenario::Void
    } else if available.len() < shape.len {
        Scenario::Insufficient
    } else {
        let candidates: Vec<Combo> = detect(&available, trump)
            .into_iter()
            .filter(|combo| shape.accepts(combo))
            .collect();
        if candidates.is_empty() {
            Scenario::EnoughRemaining
        } else {
            Scenario::ValidCombos { candidates }
        }
    };

    Ok(SuitAvailability {
        lead: shape,
        available,
        scenario,
    })
}
