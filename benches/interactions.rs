//! Benchmarks the agent-agent interaction pass under both pair
//! enumerators, mirroring the teacher's `benches/collisions.rs` shape
//! (a `criterion` group over population size).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::dvec2;
use rand::Rng;

use crowd_dynamics::agent::AgentStore;
use crowd_dynamics::config::AgentTuning;
use crowd_dynamics::interaction::{agent_agent_interactions, PairSource};

fn populate(n: usize) -> AgentStore {
    let tuning = AgentTuning::default();
    let mut rng = rand::thread_rng();
    let mut agents = AgentStore::default();
    for _ in 0..n {
        let position = dvec2(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0));
        agents.push_circular(70.0, 0.25, position, 1.2, &tuning);
    }
    agents
}

fn bench_interactions(c: &mut Criterion) {
    let mut group = c.benchmark_group("agent_agent_interactions");
    for &n in &[50usize, 200, 800] {
        group.bench_with_input(BenchmarkId::new("brute", n), &n, |b, &n| {
            b.iter_batched(
                || populate(n),
                |mut agents| agent_agent_interactions(&mut agents, PairSource::Brute, 10.0, 0.0, 0),
                criterion::BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("block_list", n), &n, |b, &n| {
            b.iter_batched(
                || populate(n),
                |mut agents| {
                    agent_agent_interactions(&mut agents, PairSource::BlockList, 3.5, 0.0, 0)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_interactions);
criterion_main!(benches);
