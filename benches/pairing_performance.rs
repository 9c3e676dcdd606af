//! Pairing engine throughput across roster sizes, trimmed from the
//! teacher's own `benches/pairing_performance.rs` down to the pure
//! in-memory engine — no database setup, no async runtime.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swisscore::service::pairing::PairingEngine;
use swisscore::service::results::{record_results, GameOutcome, GameResult};
use swisscore::{Pairing, Player, PlayerId, TiebreakKind, Tournament};

fn build_roster(size: usize) -> Vec<Player> {
    (0..size)
        .map(|i| {
            Player::new(
                PlayerId::from(format!("p{i}")),
                format!("Player {i}"),
                1000 + (i as i32 * 7) % 1200,
            )
        })
        .collect()
}

fn play_round(t: &mut Tournament, engine: &PairingEngine, round: u32) {
    let mut allow_repeat = |_: &PlayerId, _: &PlayerId| true;
    let outcome = engine
        .pair_next_round(t, round, Some(&mut allow_repeat))
        .expect("bench roster is large enough to always pair");
    let results: Vec<GameResult> = outcome
        .pairings
        .iter()
        .enumerate()
        .map(|(i, p): (usize, &Pairing)| GameResult {
            white: p.white.clone(),
            black: p.black.clone(),
            outcome: match i % 3 {
                0 => GameOutcome::WhiteWin,
                1 => GameOutcome::BlackWin,
                _ => GameOutcome::Draw,
            },
        })
        .collect();
    record_results(t, (round - 1) as usize, &results).expect("recording should succeed");
}

fn bench_pair_next_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_next_round");
    for size in [8usize, 32, 128, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut t = Tournament::new("bench", build_roster(size), 1, vec![TiebreakKind::Solkoff]);
                let engine = PairingEngine::new();
                let outcome = engine.pair_next_round(&mut t, 1, None).unwrap();
                black_box(outcome);
            });
        });
    }
    group.finish();
}

fn bench_full_tournament(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tournament");
    for size in [16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut t = Tournament::new("bench", build_roster(size), 7, vec![TiebreakKind::Solkoff]);
                let engine = PairingEngine::new();
                for round in 1..=7u32 {
                    play_round(&mut t, &engine, round);
                }
                black_box(&t);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pair_next_round, bench_full_tournament);
criterion_main!(benches);
