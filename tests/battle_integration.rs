//! Scalar battle integration tests

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish::battle::*;
use skirmish::core::{SimulationConfig, Speed, Splash};
use skirmish::roster::{Composition, UnitCatalog};

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn exact(name: &str, hp: u32, dmg: u32, speed: Speed) -> Unit {
    Unit::new(name, hp, dmg, dmg, 1.0, speed).with_splash(Splash::Never)
}

#[test]
fn test_larger_battalion_wins_in_one_round_without_losses() {
    let mut a = Army::new("A", vec![Battalion::new(10, exact("Blade", 10, 10, Speed::Normal))]).unwrap();
    let mut b = Army::new("B", vec![Battalion::new(5, exact("Blade", 10, 10, Speed::Normal))]).unwrap();

    let report = a.attack(&mut b, &mut NullObserver, &mut rng());

    assert_eq!(report.outcome, BattleOutcome::AttackerWon);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.defender_losses, vec![5]);
    assert_eq!(report.attacker_losses, vec![0]);
}

#[test]
fn test_single_splash_attack_kills_two_and_wounds_third() {
    let catapult = exact("Catapult", 50, 25, Speed::Slow).with_splash(Splash::Always);
    let mut attacker = Battalion::new(1, catapult);
    let mut target = Battalion::new(5, exact("Grunt", 10, 0, Speed::Normal));

    let outcome = attacker.attack(&mut target, &mut rng());

    assert_eq!(outcome.killed, 2);
    assert_eq!(outcome.attacked, 1);
    assert_eq!(target.n_alive(), 3);
    assert_eq!(target.units()[2].current_hp, 5);
    assert_eq!(target.units()[3].current_hp, 10);
}

#[test]
fn test_fast_battalion_lands_before_slow_one() {
    let mut strikers = Army::new(
        "Strikers",
        vec![
            Battalion::new(4, exact("Rider", 10, 10, Speed::Fast)),
            Battalion::new(4, exact("Ram", 10, 10, Speed::Slow)),
        ],
    )
    .unwrap();
    let mut target = Army::new("Target", vec![Battalion::new(12, exact("Post", 10, 0, Speed::Normal))]).unwrap();
    let mut log = BattleEventLog::new();

    strikers.resolve_tier(&mut target, Speed::Fast, &mut log, &mut rng());
    assert_eq!(target[0].n_alive(), 8);
    assert_eq!(log.kills_by("Rider"), 4);
    assert_eq!(log.kills_by("Ram"), 0);

    strikers.resolve_tier(&mut target, Speed::Slow, &mut log, &mut rng());
    assert_eq!(target[0].n_alive(), 4);
}

#[test]
fn test_same_seed_same_battle() {
    let catalog = UnitCatalog::builtin();
    let config = SimulationConfig::default();
    let player = Composition::player(20, 10, 5, 8, 10, 6);
    let bandits = Composition::bandits(20, 15, 10, 8, 10, 6);

    let fight = |seed: u64| {
        let mut a = player.build(&catalog, &config).unwrap();
        let mut d = bandits.build(&catalog, &config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        a.attack(&mut d, &mut NullObserver, &mut rng)
    };

    assert_eq!(fight(7), fight(7));
}

#[test]
fn test_revived_armies_replay_identically() {
    let catalog = UnitCatalog::builtin();
    let config = SimulationConfig::default();
    let mut a = Composition::player(30, 0, 0, 10, 20, 0).build(&catalog, &config).unwrap();
    let mut d = Composition::bandits(25, 10, 10, 0, 5, 0).build(&catalog, &config).unwrap();

    let first = a.attack(&mut d, &mut NullObserver, &mut ChaCha8Rng::seed_from_u64(3));
    a.revive();
    d.revive();
    a.revive();
    let second = a.attack(&mut d, &mut NullObserver, &mut ChaCha8Rng::seed_from_u64(3));

    assert_eq!(first, second);
}

#[test]
fn test_flankers_hit_weakest_battalion_first() {
    let mut riders = Army::new("Riders", vec![Battalion::new(3, exact("Rider", 10, 100, Speed::Fast))]).unwrap();
    let mut camp = Army::new(
        "Camp",
        vec![
            Battalion::new(3, exact("Tank", 90, 0, Speed::Normal)),
            Battalion::leader(exact("General", 1, 0, Speed::Normal)),
            Battalion::new(3, exact("Archer", 10, 0, Speed::Normal)),
        ],
    )
    .unwrap();
    let mut log = BattleEventLog::new();

    riders.resolve_tier(&mut camp, Speed::Fast, &mut log, &mut rng());

    assert_eq!(camp.defeated_counts(), vec![0, 0, 3]);
}

#[test]
fn test_tracing_observer_does_not_change_result() {
    let catalog = UnitCatalog::builtin();
    let config = SimulationConfig::default();
    let mut a = Composition::player(10, 10, 0, 0, 0, 0).build(&catalog, &config).unwrap();
    let mut d = Composition::bandits(10, 10, 0, 0, 0, 0).build(&catalog, &config).unwrap();

    let quiet = a.attack(&mut d, &mut NullObserver, &mut rng());
    a.revive();
    d.revive();
    let logged = a.attack(&mut d, &mut TracingObserver, &mut rng());

    assert_eq!(quiet, logged);
}

fn arb_unit() -> impl Strategy<Value = Unit> {
    (1u32..60, 0u32..30, 0u32..30, 0.0f64..=1.0, 0u8..3, 0u8..3, any::<bool>()).prop_map(
        |(hp, dmg_min, span, accuracy, speed, splash, flanking)| {
            let speed = Speed::try_from(speed).unwrap();
            let splash = match splash {
                0 => Splash::Never,
                1 => Splash::Always,
                _ => Splash::Chance(0.5),
            };
            Unit::new("U", hp, dmg_min, dmg_min + span, accuracy, speed)
                .with_splash(splash)
                .with_flanking(flanking)
        },
    )
}

fn arb_army() -> impl Strategy<Value = Vec<Battalion>> {
    proptest::collection::vec((1u32..15, arb_unit()), 1..4)
        .prop_map(|bats| bats.into_iter().map(|(n, u)| Battalion::new(n, u)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bookkeeping_stays_consistent(a in arb_army(), d in arb_army(), seed in any::<u64>()) {
        let mut a = Army::new("A", a).unwrap();
        let mut d = Army::new("D", d).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for round in 1..=30u32 {
            if a.is_defeated() || d.is_defeated() {
                break;
            }
            a.resolve_round(&mut d, &mut NullObserver, &mut rng);
            prop_assert_eq!(a.rounds(), round);
            prop_assert_eq!(d.rounds(), round);

            for army in [&a, &d] {
                for b in army.battalions() {
                    prop_assert!(b.n_defeated() <= b.n());
                    prop_assert!(b.n_defeated() + b.n_can_attack() <= b.n());
                    prop_assert_eq!(b.n_alive(), b.n() - b.n_defeated());
                }
                let all = army.battalions().iter().all(|b| b.is_defeated());
                prop_assert_eq!(army.is_defeated(), all);
            }
        }
    }
}
