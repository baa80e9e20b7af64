use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tractor_bot::{BotParams, GameContext, MemorySnapshot, PlayPlanner};
use tractor_core::model::card::parse_cards;
use tractor_core::{PlayerPosition, Rank, Suit, Trick, TrumpInfo};

const TRUMP_HEAVY_HAND: &str = "BJ SJ SJ#1 2S 2H 2H#1 2D AS AS#1 KS QS QS#1 JS 10S 9S 9S#1 8S 5S 4S 3C";

fn bench_route(c: &mut Criterion) {
    let trump = TrumpInfo::new(Rank::Two, Suit::Spades);
    let params = BotParams::default();
    let memory = MemorySnapshot::new();
    let hand = parse_cards(TRUMP_HEAVY_HAND).expect("bench hand parses");

    let mut group = c.benchmark_group("route_decision");

    let lead = Trick::new(PlayerPosition::North);
    group.bench_function("lead_trump_heavy", |b| {
        let ctx = GameContext::new(PlayerPosition::North, &lead, &params).with_memory(&memory);
        b.iter(|| PlayPlanner::decide(black_box(&hand), &lead, &ctx, trump))
    });

    for (label, led) in [
        ("follow_trump_pair", "6S 6S#1"),
        ("follow_trump_tractor", "6S 6S#1 7S 7S#1"),
        ("follow_plain_void", "KH KH#1"),
    ] {
        let mut trick = Trick::new(PlayerPosition::West);
        trick
            .play(
                PlayerPosition::West,
                parse_cards(led).expect("bench lead parses"),
                trump,
            )
            .expect("bench lead is playable");
        let ctx = GameContext::new(PlayerPosition::North, &trick, &params).with_memory(&memory);
        group.bench_function(label, |b| {
            b.iter(|| PlayPlanner::decide(black_box(&hand), &trick, &ctx, trump))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_route);
criterion_main!(benches);
