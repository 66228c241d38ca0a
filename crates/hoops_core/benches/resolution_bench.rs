//! Benchmarks for resolution and full-match simulation.
//!
//! Run with: cargo bench --package hoops_core --bench resolution_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hoops_core::engine::config::ResolutionConfig;
use hoops_core::engine::resolution::{resolve_defense, resolve_offense};
use hoops_core::{Catalog, EngineConfig, MatchController, Opponent, Player, SeededRandom, Skill, SkillEffect};

fn benchmark_resolution(c: &mut Criterion) {
    let config = ResolutionConfig::default();
    let player = Player::new(1, "Lin", 84, 72);
    let opponent = Opponent::new(1, "Tigers", 82, 74);
    let skill = Skill::new(1, "Hot Hand", SkillEffect::IncreaseHitRate, 15.0);
    let mut rng = SeededRandom::new(42);

    let mut group = c.benchmark_group("resolution");
    group.bench_function("offense", |b| {
        b.iter(|| {
            black_box(resolve_offense(Some(&player), Some(&skill), true, true, &config, &mut rng))
        });
    });
    group.bench_function("defense", |b| {
        b.iter(|| {
            black_box(resolve_defense(Some(&player), None, false, Some(&opponent), true, &config, &mut rng))
        });
    });
    group.finish();
}

fn benchmark_full_match(c: &mut Criterion) {
    let catalog = Catalog::demo().expect("demo catalog");

    c.bench_function("full_match_idle_clock", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut controller =
                MatchController::with_seed(catalog.clone(), EngineConfig::default(), seed)
                    .expect("valid config");
            controller.start().expect("ready match");
            controller.advance_ms(120_000);
            black_box(controller.snapshot())
        });
    });
}

criterion_group!(benches, benchmark_resolution, benchmark_full_match);
criterion_main!(benches);
