//! Headless Skirmish Runner
//!
//! Pits an autopiloted character against an enemy from the registry and
//! prints the result as JSON or text.

use clap::Parser;
use serde::Serialize;

use neon_tactics::combat::{CharacterSheet, Combatant, CombatState};
use neon_tactics::core::{CharacterClass, CombatConfig, SeededRng, Side, Stats};
use neon_tactics::engine::{AutoPilot, CombatLog, CombatOutcome, TurnController};
use neon_tactics::registry::Registry;
use neon_tactics::tactics::Environment;

/// Headless Skirmish Runner - one character against one enemy
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Resolve a single encounter and report the outcome")]
struct Args {
    /// Enemy id from enemies.toml
    #[arg(long, default_value = "street_thug")]
    enemy: String,

    /// Player class: netrunner, solo, fixer, techie or enforcer
    #[arg(long, default_value = "solo")]
    class: String,

    /// Encounter environment (standard, warehouse, street, ...)
    #[arg(long, default_value = "standard")]
    environment: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many full turns
    #[arg(long)]
    max_turns: Option<u32>,

    /// Directory holding combat.toml and the content tables
    #[arg(long)]
    data_dir: Option<String>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the combat log to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct SkirmishResult {
    outcome: CombatOutcome,
    final_turn: u32,
    player_class: CharacterClass,
    player_health: i32,
    player_max_health: i32,
    enemy: String,
    enemy_health: i32,
    enemy_max_health: i32,
    events: usize,
    seed: u64,
}

fn parse_class(name: &str) -> Option<CharacterClass> {
    CharacterClass::all()
        .into_iter()
        .find(|c| format!("{:?}", c).eq_ignore_ascii_case(name))
}

fn parse_environment(name: &str) -> Option<Environment> {
    Environment::all()
        .into_iter()
        .find(|e| format!("{:?}", e).eq_ignore_ascii_case(name))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("neon_tactics=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let (registry, mut config) = match &args.data_dir {
        Some(dir) => (
            Registry::load_dir(dir)?,
            CombatConfig::load(std::path::Path::new(dir).join("combat.toml"))?,
        ),
        None => (Registry::builtin()?, CombatConfig::default()),
    };
    if args.max_turns.is_some() {
        config.max_turns = args.max_turns;
    }

    let class = parse_class(&args.class).ok_or_else(|| format!("unknown class '{}'", args.class))?;
    let environment = parse_environment(&args.environment)
        .ok_or_else(|| format!("unknown environment '{}'", args.environment))?;
    let template = registry
        .enemy(&args.enemy)
        .ok_or_else(|| format!("unknown enemy '{}'", args.enemy))?;

    let mut sheet = CharacterSheet::new(
        "V",
        class,
        Stats {
            strength: 5,
            intelligence: 5,
            charisma: 5,
            reflex: 5,
        },
    )
    .with_abilities(registry.class_abilities(class))
    .with_items(["stim".to_string(), "smoke_grenade".to_string()]);
    let mut enemy = template.spawn();

    let state = CombatState::new(
        Combatant::from_record(&sheet, Side::Player),
        Combatant::from_record(&enemy, Side::Opponent),
        environment,
    );

    let mut controller = TurnController::new(
        state,
        std::sync::Arc::new(registry),
        config,
        SeededRng::new(seed),
    );
    let mut log = CombatLog::new();
    let outcome = controller.run(&mut AutoPilot::new(), &mut log);
    controller.write_back(&mut sheet, &mut enemy);

    if args.verbose {
        for event in &log.events {
            eprintln!("[turn {:>2}] {}", event.turn, event.description);
        }
    }

    let result = SkirmishResult {
        outcome,
        final_turn: controller.state().turn,
        player_class: class,
        player_health: sheet.health,
        player_max_health: sheet.max_health,
        enemy: enemy.name.clone(),
        enemy_health: enemy.health,
        enemy_max_health: enemy.max_health,
        events: log.len(),
        seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Skirmish Result");
            println!("===============");
            println!("Outcome: {:?}", result.outcome);
            println!("Final turn: {}", result.final_turn);
            println!(
                "Player ({:?}): {}/{}",
                result.player_class, result.player_health, result.player_max_health
            );
            println!(
                "{}: {}/{}",
                result.enemy, result.enemy_health, result.enemy_max_health
            );
            println!("Seed: {}", result.seed);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
