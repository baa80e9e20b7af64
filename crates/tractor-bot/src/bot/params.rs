use serde::Deserialize;

/// Strategy cutoffs used by the router and the leading strategy.
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotParams {
    /// Teammate combos valued above this are trusted to hold a trump trick.
    /// Also the beat threshold on tricks worth `point_trick` or more.
    pub strong_combo_value: i32,
    /// Beat threshold on low-point tricks.
    pub weak_combo_value: i32,
    /// Trick points at which the strong threshold applies.
    pub point_trick: u16,
    /// On low-point tricks a beating trump must have a rank below this.
    pub low_trick_rank_cap: u8,
    /// Cheapest trump value that still counts as a face-card ruff.
    pub face_trump_floor: i32,
    /// Trick points that always justify feeding the teammate.
    pub contribute_high_points: u16,
    /// Trick points that justify feeding late in the round or under pressure.
    pub contribute_medium_points: u16,
    /// Hand size at or below which the round counts as nearly over.
    pub few_cards: usize,
    /// Hand size at or below which any points are worth feeding.
    pub very_few_cards: usize,
    pub ruff_high_points: u16,
    pub ruff_medium_points: u16,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            strong_combo_value: 150,
            weak_combo_value: 100,
            point_trick: 10,
            low_trick_rank_cap: 10,
            face_trump_floor: 111,
            contribute_high_points: 15,
            contribute_medium_points: 10,
            few_cards: 6,
            very_few_cards: 3,
            ruff_high_points: 20,
            ruff_medium_points: 10,
        }
    }
}

impl BotParams {
    /// Beat threshold for a trick currently worth `trick_points`.
    pub const fn beat_threshold(&self, trick_points: u16) -> i32 {
        if trick_points >= self.point_trick {
            self.strong_combo_value
        } else {
            self.weak_combo_value
        }
    }
}
