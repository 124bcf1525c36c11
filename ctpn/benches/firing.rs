/// Firing throughput of a ring of places
///
///   pl0 ──► tr0 ──► pl1 ──► tr1 ──► ... ──► pl{n-1} ──► tr{n-1} ──┐
///    ▲                                                            │
///    └────────────────────────────────────────────────────────────┘
///
/// A single token with a counter value travels around the ring; each transition consumes it and
/// produces it again with the counter decremented by one. One iteration fires every transition
/// once, so a single run is `n` firings.
///
/// `engine` measures the pure engine, `registry` the same ring behind a registry (lock +
/// observer-less service), i.e. the overhead a caller pays per firing.
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ctpn::{
    net::{Arc, PetriNet, Place, Token, Transition},
    registry::NetRegistry,
    state::NetState,
    CtpnService, PetriNetEngine,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

fn ring(size: usize) -> PetriNet<u64, u64> {
    let places = (0..size).map(|i| Place::new(format!("pl{i}"), format!("place {i}")));
    let transitions =
        (0..size).map(|i| Transition::unbounded(format!("tr{i}"), format!("transition {i}"), 0));
    let arcs = (0..size).flat_map(|i| {
        [
            Arc::input(format!("pl{i}"), format!("tr{i}"), |b: &u64| vec![Token::new(*b, 0)]),
            Arc::output(format!("pl{}", (i + 1) % size), format!("tr{i}"), |b: &u64| {
                vec![Token::new(b.saturating_sub(1), 0)]
            }),
        ]
    });
    PetriNet::new(places, transitions, arcs).expect("ring is a valid net")
}

fn run_engine(net: &PetriNet<u64, u64>, size: usize, iters: u64) -> Duration {
    let engine = PetriNetEngine::new();
    let start = Instant::now();
    for _ in 0..iters {
        let mut state = NetState::default().with_token("pl0", Token::new(size as u64, 0));
        let mut counter = size as u64;
        for i in 0..size {
            let result = engine
                .fire_transition(net, &state, &format!("tr{i}"), &counter)
                .expect("ring transition should fire");
            state = result.into_parts().0;
            counter -= 1;
        }
    }
    start.elapsed()
}

async fn run_registry(size: usize, iters: u64) -> Duration {
    let registry = NetRegistry::<u64, u64>::default();
    let id = Uuid::new_v4();
    let start = Instant::now();
    for _ in 0..iters {
        let mut service = CtpnService::new(ring(size));
        let initial = NetState::default().with_token("pl0", Token::new(size as u64, 0));
        service.set_initial_state(initial);
        registry.insert(id, service).await;
        for (i, counter) in (1..=size as u64).rev().enumerate() {
            registry
                .fire(id, &format!("tr{i}"), &counter)
                .await
                .expect("ring transition should fire");
        }
    }
    start.elapsed()
}

fn benchmark_firing(c: &mut Criterion) {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(tracing_subscriber::EnvFilter::try_new("error").unwrap())
        .init();

    let rt = Runtime::new().expect("Failed to create tokio runtime");
    let mut group = c.benchmark_group("firing");
    for &size in [1usize, 4, 16, 64, 256].iter() {
        let net = ring(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("engine", size), &size, |b, &size| {
            b.iter_custom(|iters| run_engine(&net, size, iters));
        });
        group.bench_with_input(BenchmarkId::new("registry", size), &size, |b, &size| {
            b.to_async(&rt).iter_custom(|iters| run_registry(size, iters));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_firing);
criterion_main!(benches);
