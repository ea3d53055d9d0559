//! EcoSim Headless Simulation Harness
//!
//! Validates configuration handling and population dynamics in-process,
//! with no rendering or windowing.
//!
//! Usage:
//!   cargo run -p ecosim-simtest
//!   cargo run -p ecosim-simtest -- --ticks 7200 --preset herbivore --verbose

use std::path::PathBuf;

use clap::Parser;
use ecosim_core::config::validate_config;
use ecosim_core::events::EventKind;
use ecosim_core::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "ecosim-simtest")]
#[command(about = "Run the ecosystem simulation headless and check its invariants")]
struct Args {
    /// Ticks to simulate in the population run
    #[arg(short, long, default_value = "3600")]
    ticks: u64,

    /// Random seed (config value if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seed preset: all, grass, herbivore or carnivore
    #[arg(short, long)]
    preset: Option<SeedPreset>,

    /// Ticks advanced per frame
    #[arg(long, default_value = "1")]
    speed: u32,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print passing checks and the event log
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    sim_time: f64,
    final_population: Population,
    peak_population: Population,
    births: u64,
    deaths: u64,
    history_samples: usize,
}

fn main() {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    println!("=== EcoSim Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Config validation
    results.extend(validate_config_handling());

    // 2. Spawning and population cap
    results.extend(validate_spawning());

    // 3. Determinism
    results.extend(validate_determinism(&config));

    // 4. Population run
    let (run_results, summary) = run_population(&config, &args);
    results.extend(run_results);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("\n{}", json),
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(preset) = args.preset {
        config.preset = preset;
    }
    Ok(config)
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config_handling() -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    let issues = validate_config(&SimConfig::default());
    results.push(TestResult {
        name: "config_default_valid".into(),
        passed: issues.is_empty(),
        detail: format!("{} issues in default config", issues.len()),
    });

    let broken = SimConfig {
        dt: -1.0,
        population_cap: 0,
        ..Default::default()
    };
    let rejected = SimulationEngine::try_new(broken);
    results.push(TestResult {
        name: "config_invalid_rejected".into(),
        passed: matches!(&rejected, Err(SimError::InvalidConfig(issues)) if issues.len() == 2),
        detail: match &rejected {
            Err(e) => e.to_string(),
            Ok(_) => "engine built from an invalid config".into(),
        },
    });

    let parsed = SimConfig::from_json(r#"{"arena_size": 600.0, "preset": "carnivore_only"}"#);
    results.push(TestResult {
        name: "config_json_defaults".into(),
        passed: matches!(
            &parsed,
            Ok(c) if c.arena_size == 600.0 && c.dt == SimConfig::default().dt
        ),
        detail: format!("{:?}", parsed.as_ref().map(|c| (c.arena_size, c.preset))),
    });

    results
}

// ── 2. Spawning ─────────────────────────────────────────────────────────

fn validate_spawning() -> Vec<TestResult> {
    println!("--- Spawning ---");
    let mut results = Vec::new();

    let cap = 25;
    let mut engine = SimulationEngine::new(SimConfig {
        initial_agents: 0,
        population_cap: cap,
        ..Default::default()
    });
    let accepted = (0..cap + 5)
        .filter(|i| {
            engine.create_agent(*i as f32 * 20.0, 400.0, Kind::Grass, SpawnParams::default())
        })
        .count();
    results.push(TestResult {
        name: "spawn_cap_enforced".into(),
        passed: accepted == cap && engine.population().grass == cap,
        detail: format!("{} of {} spawns accepted with cap {}", accepted, cap + 5, cap),
    });

    let refused = engine
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::CapReached { .. }))
        .count();
    results.push(TestResult {
        name: "spawn_cap_logged".into(),
        passed: refused == 5,
        detail: format!("{} cap events", refused),
    });

    engine.create_agent(400.0, 400.0, Kind::Carnivore, SpawnParams::default());
    let killed = engine.kill_at(425.0, 375.0);
    let population = engine.population();
    results.push(TestResult {
        name: "kill_leaves_carcass".into(),
        passed: killed >= 1 && population.carnivores == 0 && population.carcasses == 1,
        detail: format!("killed {}, {} carcasses", killed, population.carcasses),
    });

    results
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Determinism ---");

    let run = || -> Result<Population, SimError> {
        let mut engine = SimulationEngine::try_new(config.clone())?;
        for _ in 0..600 {
            engine.tick();
        }
        Ok(engine.population())
    };

    let (first, second) = (run(), run());
    let passed = matches!((&first, &second), (Ok(a), Ok(b)) if a == b);
    vec![TestResult {
        name: "determinism_same_seed".into(),
        passed,
        detail: format!("{:?} vs {:?}", first.ok(), second.ok()),
    }]
}

// ── 4. Population run ───────────────────────────────────────────────────

fn run_population(config: &SimConfig, args: &Args) -> (Vec<TestResult>, RunSummary) {
    println!("--- Population Run ---");
    let mut results = Vec::new();

    let mut engine = match SimulationEngine::try_new(config.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "run_engine_created".into(),
                passed: false,
                detail: e.to_string(),
            });
            return (results, empty_summary(config));
        }
    };
    engine.set_speed_multiplier(args.speed.max(1));

    let mut peak = engine.population();
    let mut vitals_violations = 0;

    while engine.tick_count() < args.ticks {
        engine.advance_frame();

        let population = engine.population();
        peak.grass = peak.grass.max(population.grass);
        peak.herbivores = peak.herbivores.max(population.herbivores);
        peak.carnivores = peak.carnivores.max(population.carnivores);
        peak.carcasses = peak.carcasses.max(population.carcasses);

        for kind in Kind::ALL {
            for view in engine.agents_of_kind(kind) {
                let health_ok = view.health > 0.0 && view.health <= 100.0;
                let hunger_ok = view.hunger.map_or(true, |h| (0.0..=100.0).contains(&h));
                if !(health_ok && hunger_ok) {
                    vitals_violations += 1;
                }
            }
        }
    }

    let population = engine.population();
    log::info!(
        "Run finished after {:.1}s: {} grass, {} herbivores, {} carnivores, {} carcasses",
        engine.sim_time(),
        population.grass,
        population.herbivores,
        population.carnivores,
        population.carcasses
    );

    results.push(TestResult {
        name: "run_vitals_in_range".into(),
        passed: vitals_violations == 0,
        detail: format!("{} out-of-range readings", vitals_violations),
    });

    let cap = config.population_cap;
    let capped = [peak.grass, peak.herbivores, peak.carnivores, peak.carcasses]
        .iter()
        .all(|&n| n <= cap);
    results.push(TestResult {
        name: "run_population_capped".into(),
        passed: capped,
        detail: format!("peak {:?}, cap {}", peak, cap),
    });

    let expected_samples = (engine.sim_time() / config.history_interval as f64) as usize;
    let samples = engine.history().len();
    results.push(TestResult {
        name: "run_history_sampled".into(),
        passed: samples >= expected_samples.min(config.history_capacity),
        detail: format!("{} samples over {:.1}s", samples, engine.sim_time()),
    });

    if args.verbose {
        for event in engine.events().iter() {
            println!("    {}", event.describe(engine.sim_time()));
        }
    }

    let summary = RunSummary {
        seed: config.seed,
        ticks: engine.tick_count(),
        sim_time: engine.sim_time(),
        final_population: population,
        peak_population: peak,
        births: engine.events().total_births(),
        deaths: engine.events().total_deaths(),
        history_samples: samples,
    };
    (results, summary)
}

fn empty_summary(config: &SimConfig) -> RunSummary {
    RunSummary {
        seed: config.seed,
        ticks: 0,
        sim_time: 0.0,
        final_population: Population::default(),
        peak_population: Population::default(),
        births: 0,
        deaths: 0,
        history_samples: 0,
    }
}
