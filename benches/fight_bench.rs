//! Battle throughput: scalar battles vs the batch engine
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish::battle::{Army, Battalion, NullObserver, Unit};
use skirmish::core::{SimulationConfig, Speed, Splash};
use skirmish::roster::Scenario;
use skirmish::simulation::{run_battles, run_parallel, FightSimulation};

fn siege_armies() -> (Army, Army) {
    let attacker = Army::new(
        "Siege",
        vec![
            Battalion::new(60, Unit::new("Catapult", 30, 10, 30, 0.5, Speed::Slow)),
            Battalion::new(40, Unit::new("Sling", 15, 5, 15, 0.6, Speed::Normal).with_splash(Splash::Always)),
        ],
    )
    .expect("valid siege army");
    let defender = Army::new(
        "Keep",
        vec![
            Battalion::new(80, Unit::new("Hound", 20, 5, 20, 0.5, Speed::Fast).with_splash(Splash::Always)),
            Battalion::new(20, Unit::new("Trebuchet", 60, 20, 40, 0.5, Speed::Slow)),
        ],
    )
    .expect("valid keep army");
    (attacker, defender)
}

fn bench_scalar(c: &mut Criterion) {
    let (attacker, defender) = Scenario::skirmish().build().expect("stock skirmish");

    let mut group = c.benchmark_group("scalar");
    group.throughput(Throughput::Elements(1));
    group.bench_function("skirmish_battle", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter_batched(
            || (attacker.clone(), defender.clone()),
            |(mut a, mut d)| black_box(a.attack(&mut d, &mut NullObserver, &mut rng)),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let (attacker, defender) = siege_armies();
    let trials = 10_000;

    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.throughput(Throughput::Elements(trials as u64));

    group.bench_function("columnar_10k", |b| {
        let mut sim = FightSimulation::new(&attacker, &defender);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| black_box(sim.run_to_completion(trials, &mut rng)))
    });

    let config = SimulationConfig::default();
    group.bench_function("columnar_parallel_10k", |b| {
        b.iter(|| black_box(run_parallel(&attacker, &defender, trials, &config)))
    });
    group.bench_function("scalar_parallel_10k", |b| {
        b.iter(|| black_box(run_battles(&attacker, &defender, trials, &config)))
    });
    group.finish();
}

criterion_group!(benches, bench_scalar, bench_batch);
criterion_main!(benches);
