//! Property tests for the engine's population bookkeeping.

use proptest::prelude::*;

use quarantine_sim::core::commands::PlayerCommand;
use quarantine_sim::core::config::EpidemicConfig;
use quarantine_sim::core::enums::OutcomeState;
use quarantine_sim::core::types::Position;
use quarantine_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Clone)]
enum Step {
    Tick(u8),
    Spawn(f64, f64),
    Remove(u32),
    Heal(u32, f64),
    Cure(u32, f64),
    Reveal(f64, f64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (1_u8..20).prop_map(Step::Tick),
        2 => ((-3.0_f64..3.0), (-3.0_f64..3.0)).prop_map(|(x, y)| Step::Spawn(x, y)),
        1 => (0_u32..24).prop_map(Step::Remove),
        1 => ((0_u32..24), (0.0_f64..1.0)).prop_map(|(id, a)| Step::Heal(id, a)),
        1 => ((0_u32..24), (0.0_f64..3.0)).prop_map(|(id, s)| Step::Cure(id, s)),
        1 => ((-3.0_f64..3.0), (-3.0_f64..3.0)).prop_map(|(x, y)| Step::Reveal(x, y)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn tracked_counters_match_live_scan(
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..48),
    ) {
        let mut config = EpidemicConfig::default();
        config.seed = Some(seed);
        config.population.count = 8;
        config.population.spawn_radius = 3.0;
        config.infection.base_infection_rate_per_second = 0.2;
        config.outcome.max_allowed_sick = 4;
        config.outcome.freeze_on_end = false;

        let mut engine = SimulationEngine::new(SimConfig::from(config));
        engine.queue_command(PlayerCommand::StartSimulation);
        let mut first_terminal = None;

        for step in &steps {
            match *step {
                Step::Tick(n) => {
                    for _ in 0..n {
                        let snap = engine.tick();
                        prop_assert_eq!(snap.counters, snap.live);
                        prop_assert!(snap.counters.sick <= snap.counters.total);
                        prop_assert!(snap.counters.contagious <= snap.counters.sick);

                        // Terminal states never change.
                        if snap.outcome.state != OutcomeState::Playing {
                            let first = *first_terminal.get_or_insert(snap.outcome.state);
                            prop_assert_eq!(first, snap.outcome.state);
                        }
                    }
                }
                Step::Spawn(x, y) => {
                    prop_assert!(engine.spawn_agent_at(Position::new(x, y, 0.0)).is_ok());
                }
                Step::Remove(agent_id) => {
                    engine.queue_command(PlayerCommand::RemoveAgent { agent_id });
                }
                Step::Heal(agent_id, amount) => {
                    engine.queue_command(PlayerCommand::Heal { agent_id, amount });
                }
                Step::Cure(agent_id, seconds) => {
                    engine.queue_command(PlayerCommand::Cure { agent_id, seconds });
                }
                Step::Reveal(x, y) => {
                    engine.queue_command(PlayerCommand::RevealArea { x, y, radius: 2.0 });
                }
            }
        }
    }
}
