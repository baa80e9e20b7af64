mod stats;

pub use stats::{AuditStats, AuditSummary, LatencySummary};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use tractor_bot::{HeuristicPolicy, MemorySnapshot, Policy, PolicyContext};
use tractor_core::model::card::Card;
use tractor_core::model::deck::Deck;
use tractor_core::model::player::PlayerPosition;
use tractor_core::model::rank::Rank;
use tractor_core::model::suit::Suit;
use tractor_core::model::trick::{Trick, TrickError};
use tractor_core::model::trump::TrumpInfo;
use tractor_core::{RuleError, is_valid_play};

use crate::config::{AuditConfig, ResolvedOutputs, TrumpConfig};

/// Cards dealt to each seat; the rest of the double deck is the kitty.
pub const HAND_SIZE: usize = 25;
const SEATS: usize = 4;

/// Plays seeded rounds through four heuristic seats and audits every decision.
pub struct AuditRunner {
    config: AuditConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub rounds_played: usize,
    pub decisions: usize,
    pub illegal_decisions: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub audit: AuditSummary,
}

#[derive(Debug, Serialize)]
struct DecisionRow<'a> {
    run_id: &'a str,
    deal_id: String,
    round_index: usize,
    trick_index: usize,
    seat: PlayerPosition,
    decision_point: &'static str,
    scenario: &'static str,
    cards: String,
    legal: bool,
}

impl AuditRunner {
    pub fn new(config: AuditConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute the audit, streaming one JSONL row per decision.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let budget = Duration::from_millis(self.config.metrics.latency_budget_ms);
        let mut stats = AuditStats::new(budget);
        let mut rows_written = 0usize;

        for round_index in 0..self.config.deals.rounds {
            let deal_seed = rng.next_u64();
            let trump = resolve_trump(self.config.trump, &mut rng);
            let leader = PlayerPosition::LOOP[round_index % SEATS];
            let mut round = RoundAudit {
                run_id: &self.config.run_id,
                deal_id: format!("R{round_index:05}_{deal_seed:016x}"),
                round_index,
                writer: &mut writer,
                stats: &mut stats,
                rows_written: 0,
            };
            let attacker_points = round.play(deal_seed, trump, leader, &self.config)?;
            rows_written += round.rows_written;

            event!(
                target: "tractor_bench::round",
                Level::INFO,
                round_index,
                deal_seed,
                trump = %trump,
                leader = ?leader,
                attacker_points,
            );
        }

        writer.flush()?;

        let decisions = stats.decisions();
        let illegal_decisions = stats.illegal();
        let audit = stats.finalize(&self.config.run_id, self.config.deals.rounds);
        audit.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            rounds_played: self.config.deals.rounds,
            decisions,
            illegal_decisions,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            audit,
        })
    }
}

struct RoundAudit<'a, W: Write> {
    run_id: &'a str,
    deal_id: String,
    round_index: usize,
    writer: &'a mut W,
    stats: &'a mut AuditStats,
    rows_written: usize,
}

impl<W: Write> RoundAudit<'_, W> {
    /// Play one deal to the last trick. Returns the points East/West collected.
    fn play(
        &mut self,
        deal_seed: u64,
        trump: TrumpInfo,
        first_leader: PlayerPosition,
        config: &AuditConfig,
    ) -> Result<u16, RunnerError> {
        let mut hands = deal(deal_seed);
        let mut policies: Vec<HeuristicPolicy> = (0..SEATS)
            .map(|_| HeuristicPolicy::new(config.params))
            .collect();
        let mut memory = MemorySnapshot::new();
        let mut leader = first_leader;
        let mut attacker_points = 0u16;
        let mut trick_index = 0usize;

        while !hands[leader.index()].is_empty() {
            let mut trick = Trick::new(leader);
            let mut seat = leader;
            for _ in 0..SEATS {
                let hand = &hands[seat.index()];
                let ctx = PolicyContext {
                    seat,
                    hand,
                    trick: &trick,
                    trump,
                    attacking: is_attacker(seat),
                    attacker_points,
                    memory: Some(&memory),
                };

                let started = Instant::now();
                let decision = policies[seat.index()].choose_play(&ctx)?;
                let elapsed = started.elapsed();

                let legal = is_valid_play(&decision.cards, trick.lead(), hand, trump)?;
                if !legal {
                    event!(
                        target: "tractor_bench::audit",
                        Level::ERROR,
                        deal_id = %self.deal_id,
                        trick_index,
                        seat = ?seat,
                        decision_point = decision.decision_point.as_str(),
                        cards = %join_cards(&decision.cards),
                    );
                }

                let decision_point = decision.decision_point.as_str();
                self.stats
                    .record(decision_point, decision.scenario, legal, elapsed);
                self.write_row(DecisionRow {
                    run_id: self.run_id,
                    deal_id: self.deal_id.clone(),
                    round_index: self.round_index,
                    trick_index,
                    seat,
                    decision_point,
                    scenario: decision.scenario,
                    cards: join_cards(&decision.cards),
                    legal,
                })?;

                memory.record_play(seat, &decision.cards, trick.lead_group(trump), trump);
                hands[seat.index()].retain(|card| !decision.cards.contains(card));
                trick.play(seat, decision.cards, trump)?;
                seat = seat.next();
            }

            let winner = trick.winner().ok_or(RunnerError::Unresolved { trick_index })?;
            if is_attacker(winner) {
                attacker_points += trick.points();
            }
            leader = winner;
            trick_index += 1;
        }

        Ok(attacker_points)
    }

    fn write_row(&mut self, row: DecisionRow<'_>) -> Result<(), RunnerError> {
        serde_json::to_writer(&mut *self.writer, &row)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }
}

/// East/West attack; North/South hold the declaration.
fn is_attacker(seat: PlayerPosition) -> bool {
    seat.index() % 2 == 1
}

fn deal(seed: u64) -> [Vec<Card>; SEATS] {
    let mut hands: [Vec<Card>; SEATS] = Default::default();
    for (idx, card) in Deck::shuffled_with_seed(seed)
        .into_cards()
        .into_iter()
        .take(HAND_SIZE * SEATS)
        .enumerate()
    {
        hands[idx % SEATS].push(card);
    }
    hands
}

/// Fill in whatever the config leaves open from the run's RNG.
fn resolve_trump(config: TrumpConfig, rng: &mut StdRng) -> TrumpInfo {
    let rank = config
        .rank
        .unwrap_or_else(|| Rank::ORDERED[rng.gen_range(0..Rank::ORDERED.len())]);
    if config.no_suit {
        return TrumpInfo::no_suit(rank);
    }
    let suit = config
        .suit
        .or_else(|| Suit::from_index(rng.gen_range(0..=Suit::ALL.len())));
    match suit {
        Some(suit) => TrumpInfo::new(rank, suit),
        None => TrumpInfo::no_suit(rank),
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize decision row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("rule evaluation failed: {0}")]
    Rule(#[from] RuleError),
    #[error("trick rejected a play: {0}")]
    Trick(#[from] TrickError),
    #[error("trick {trick_index} finished without a winner")]
    Unresolved { trick_index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_leaves_eight_card_kitty() {
        let hands = deal(11);
        assert!(hands.iter().all(|hand| hand.len() == HAND_SIZE));
        let mut all: Vec<Card> = hands.concat();
        all.sort_by_key(|card| card.to_string());
        all.dedup();
        assert_eq!(all.len(), HAND_SIZE * SEATS);
    }

    #[test]
    fn fixed_trump_ignores_rng() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = TrumpConfig {
            rank: Some(Rank::Seven),
            suit: Some(Suit::Hearts),
            no_suit: false,
        };
        assert_eq!(
            resolve_trump(config, &mut rng),
            TrumpInfo::new(Rank::Seven, Suit::Hearts)
        );
    }

    #[test]
    fn no_suit_flag_wins_over_suit() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = TrumpConfig {
            rank: Some(Rank::Five),
            suit: Some(Suit::Clubs),
            no_suit: true,
        };
        assert_eq!(
            resolve_trump(config, &mut rng),
            TrumpInfo::no_suit(Rank::Five)
        );
    }

    #[test]
    fn drawn_trump_is_reproducible() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..8)
                .map(|_| resolve_trump(TrumpConfig::default(), &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn attackers_are_east_and_west() {
        assert!(!is_attacker(PlayerPosition::North));
        assert!(is_attacker(PlayerPosition::East));
        assert!(!is_attacker(PlayerPosition::South));
        assert!(is_attacker(PlayerPosition::West));
    }
}
