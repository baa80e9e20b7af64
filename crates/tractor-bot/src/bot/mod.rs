mod lead;
mod memory;
mod params;
mod play;
mod route;
mod select;

pub use lead::choose_lead;
pub use memory::MemorySnapshot;
pub use params::BotParams;
pub use play::{PlayDecision, PlayPlanner};
pub use route::{RouteError, route_decision, route_with_trace};
pub use select::{Direction, disposal_order, select_cards, select_combos};

use core::fmt;
use tractor_core::model::card::Card;
use tractor_core::model::player::PlayerPosition;
use tractor_core::model::trick::Trick;
use tractor_core::model::trump::{SuitGroup, TrumpInfo};

/// Seat order within the current trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrickPosition {
    First,
    Second,
    Third,
    Fourth,
}

impl TrickPosition {
    /// Position of the next player given how many have already played.
    pub const fn from_played(played: usize) -> Self {
        match played {
            0 => TrickPosition::First,
            1 => TrickPosition::Second,
            2 => TrickPosition::Third,
            _ => TrickPosition::Fourth,
        }
    }

    pub const fn is_last(self) -> bool {
        matches!(self, TrickPosition::Fourth)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TrickPosition::First => "first",
            TrickPosition::Second => "second",
            TrickPosition::Third => "third",
            TrickPosition::Fourth => "fourth",
        }
    }
}

/// How close the attacking team is to taking the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointPressure {
    Low,
    Medium,
    High,
}

impl PointPressure {
    pub const fn from_attacker_points(points: u16) -> Self {
        if points < 40 {
            PointPressure::Low
        } else if points < 70 {
            PointPressure::Medium
        } else {
            PointPressure::High
        }
    }

    pub const fn is_elevated(self) -> bool {
        !matches!(self, PointPressure::Low)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PointPressure::Low => "low",
            PointPressure::Medium => "medium",
            PointPressure::High => "high",
        }
    }
}

/// Everything a decision needs beyond the hand and the trick.
#[derive(Debug, Clone, Copy)]
pub struct GameContext<'a> {
    pub seat: PlayerPosition,
    pub position: TrickPosition,
    pub attacking: bool,
    pub pressure: PointPressure,
    pub memory: Option<&'a MemorySnapshot>,
    pub params: &'a BotParams,
}

impl<'a> GameContext<'a> {
    pub fn new(seat: PlayerPosition, trick: &Trick, params: &'a BotParams) -> Self {
        Self {
            seat,
            position: TrickPosition::from_played(trick.plays().len()),
            attacking: false,
            pressure: PointPressure::Low,
            memory: None,
            params,
        }
    }

    pub fn with_memory(mut self, memory: &'a MemorySnapshot) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_pressure(mut self, attacking: bool, pressure: PointPressure) -> Self {
        self.attacking = attacking;
        self.pressure = pressure;
        self
    }

    pub fn is_last(&self) -> bool {
        self.position.is_last()
    }

    /// Whether the seat after us is known to be void in `group`. Always false
    /// for the last player and without memory.
    pub fn next_seat_void(&self, group: SuitGroup) -> bool {
        if self.is_last() {
            return false;
        }
        self.memory
            .is_some_and(|memory| memory.is_void(self.seat.next(), group))
    }
}

/// Who holds the trick right now, seen from `seat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickAnalysis {
    pub winner: PlayerPosition,
    pub is_teammate: bool,
    pub winning_cards: Vec<Card>,
    /// Basic value of the winning play.
    pub winning_value: i32,
    /// The winner ruffed a plain-suit lead.
    pub trumped_in: bool,
    pub points: u16,
}

impl TrickAnalysis {
    pub fn of(trick: &Trick, seat: PlayerPosition, trump: TrumpInfo) -> Option<Self> {
        let winning = trick.winning_play()?;
        let lead_group = trick.lead_group(trump)?;
        let trumped_in = !lead_group.is_trump()
            && trump.shared_group(&winning.cards) == Some(SuitGroup::Trump);
        Some(Self {
            winner: winning.position,
            is_teammate: winning.position != seat && winning.position.same_team(seat),
            winning_cards: winning.cards.clone(),
            winning_value: trump.combo_value(&winning.cards, tractor_core::ValueMode::Basic),
            trumped_in,
            points: trick.points(),
        })
    }
}

/// Label for the branch that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionPoint {
    LeadTractor,
    LeadBiggestPair,
    LeadBiggestSingle,
    LeadLowSingle,
    LeadTrumpSingle,
    OnlyCandidate,
    TrumpContribute,
    TrumpBeat,
    TrumpDispose,
    SuitContribute,
    SuitBeat,
    SuitDispose,
    RemainingContribute,
    RemainingDispose,
    VoidContribute,
    VoidDispose,
    RuffStrongest,
    RuffFace,
    RuffWeakest,
    RuffPoints,
    RuffMiddle,
    InsufficientFill,
    FallbackDispose,
    FallbackFirstCards,
    GuardSearch,
    GuardEmergency,
}

impl DecisionPoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionPoint::LeadTractor => "lead_tractor",
            DecisionPoint::LeadBiggestPair => "lead_biggest_pair",
            DecisionPoint::LeadBiggestSingle => "lead_biggest_single",
            DecisionPoint::LeadLowSingle => "lead_low_single",
            DecisionPoint::LeadTrumpSingle => "lead_trump_single",
            DecisionPoint::OnlyCandidate => "only_candidate",
            DecisionPoint::TrumpContribute => "trump_contribute",
            DecisionPoint::TrumpBeat => "trump_beat",
            DecisionPoint::TrumpDispose => "trump_dispose",
            DecisionPoint::SuitContribute => "suit_contribute",
            DecisionPoint::SuitBeat => "suit_beat",
            DecisionPoint::SuitDispose => "suit_dispose",
            DecisionPoint::RemainingContribute => "remaining_contribute",
            DecisionPoint::RemainingDispose => "remaining_dispose",
            DecisionPoint::VoidContribute => "void_contribute",
            DecisionPoint::VoidDispose => "void_dispose",
            DecisionPoint::RuffStrongest => "ruff_strongest",
            DecisionPoint::RuffFace => "ruff_face",
            DecisionPoint::RuffWeakest => "ruff_weakest",
            DecisionPoint::RuffPoints => "ruff_points",
            DecisionPoint::RuffMiddle => "ruff_middle",
            DecisionPoint::InsufficientFill => "insufficient_fill",
            DecisionPoint::FallbackDispose => "fallback_dispose",
            DecisionPoint::FallbackFirstCards => "fallback_first_cards",
            DecisionPoint::GuardSearch => "guard_search",
            DecisionPoint::GuardEmergency => "guard_emergency",
        }
    }

    pub const fn is_lead(self) -> bool {
        matches!(
            self,
            DecisionPoint::LeadTractor
                | DecisionPoint::LeadBiggestPair
                | DecisionPoint::LeadBiggestSingle
                | DecisionPoint::LeadLowSingle
                | DecisionPoint::LeadTrumpSingle
        )
    }
}

impl fmt::Display for DecisionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tractor_core::model::card::parse_cards;
    use tractor_core::model::rank::Rank;
    use tractor_core::model::suit::Suit;

    fn trump() -> TrumpInfo {
        TrumpInfo::new(Rank::Two, Suit::Spades)
    }

    #[test]
    fn pressure_bands() {
        assert_eq!(PointPressure::from_attacker_points(0), PointPressure::Low);
        assert_eq!(PointPressure::from_attacker_points(39), PointPressure::Low);
        assert_eq!(PointPressure::from_attacker_points(40), PointPressure::Medium);
        assert_eq!(PointPressure::from_attacker_points(69), PointPressure::Medium);
        assert_eq!(PointPressure::from_attacker_points(70), PointPressure::High);
    }

    #[test]
    fn position_follows_trick_length() {
        let params = BotParams::default();
        let mut trick = Trick::new(PlayerPosition::North);
        trick
            .play(PlayerPosition::North, parse_cards("3C").unwrap(), trump())
            .unwrap();
        let ctx = GameContext::new(PlayerPosition::East, &trick, &params);
        assert_eq!(ctx.position, TrickPosition::Second);
        assert!(!ctx.is_last());
    }

    #[test]
    fn analysis_spots_teammate_ruff() {
        let mut trick = Trick::new(PlayerPosition::North);
        trick
            .play(PlayerPosition::North, parse_cards("KH").unwrap(), trump())
            .unwrap();
        trick
            .play(PlayerPosition::East, parse_cards("AH").unwrap(), trump())
            .unwrap();
        trick
            .play(PlayerPosition::South, parse_cards("4S").unwrap(), trump())
            .unwrap();

        let analysis = TrickAnalysis::of(&trick, PlayerPosition::North, trump()).unwrap();
        assert_eq!(analysis.winner, PlayerPosition::South);
        assert!(analysis.is_teammate);
        assert!(analysis.trumped_in);
        assert_eq!(analysis.points, 10);
        assert_eq!(analysis.winning_value, 104);
    }

    #[test]
    fn empty_trick_has_no_analysis() {
        let trick = Trick::new(PlayerPosition::North);
        assert!(TrickAnalysis::of(&trick, PlayerPosition::East, trump()).is_none());
    }

    #[test]
    fn next_seat_void_needs_memory() {
        let params = BotParams::default();
        let trick = Trick::new(PlayerPosition::North);
        let mut memory = MemorySnapshot::new();
        memory.mark_void(PlayerPosition::East, SuitGroup::Plain(Suit::Hearts));

        let ctx = GameContext::new(PlayerPosition::North, &trick, &params);
        assert!(!ctx.next_seat_void(SuitGroup::Plain(Suit::Hearts)));
        let ctx = ctx.with_memory(&memory);
        assert!(ctx.next_seat_void(SuitGroup::Plain(Suit::Hearts)));
    }

    #[test]
    fn lead_labels_are_split_from_follow_labels() {
        assert!(DecisionPoint::LeadTractor.is_lead());
        assert!(!DecisionPoint::RuffFace.is_lead());
        assert_eq!(DecisionPoint::InsufficientFill.to_string(), "insufficient_fill");
    }
}
