//! Roll Dodge headless runner
//!
//! Drives the environment with a built-in policy and reports per-episode
//! results. Rendering and keyboard input are left to external shims.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use roll_dodge::{Action, EnvConfig, EnvError, Environment};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Uniformly random actions
    Random,
    /// Never move
    Hold,
    /// Always drift left
    Left,
    /// Always drift right
    Right,
    /// Move away from the side whose rays report the closest obstacle
    Dodge,
}

#[derive(Parser)]
#[command(name = "roll-dodge", about = "Run headless Roll Dodge episodes")]
struct Cli {
    /// Policy that picks actions
    #[arg(long, value_enum, default_value_t = PolicyKind::Dodge)]
    policy: PolicyKind,

    /// Number of episodes to run
    #[arg(long, default_value_t = 5)]
    episodes: u32,

    /// Step limit per episode
    #[arg(long, default_value_t = 3600)]
    max_steps: u64,

    /// Seed (overrides the config file's seed)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON environment config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every step as a JSON line
    #[arg(long)]
    json: bool,
}

/// Pick the side with less pressure; ray values are [x, left ... right]
fn dodge(observation: &[f32]) -> Action {
    let rays = &observation[1..];
    let half = rays.len() / 2;
    let left: f32 = rays[..half].iter().sum();
    let right: f32 = rays[rays.len() - half..].iter().sum();
    if left == 0.0 && right == 0.0 {
        Action::Hold
    } else if left >= right {
        Action::Right
    } else {
        Action::Left
    }
}

fn choose(policy: PolicyKind, observation: &[f32], rng: &mut Pcg32) -> Action {
    match policy {
        PolicyKind::Random => match rng.random_range(0..Action::COUNT) {
            0 => Action::Left,
            1 => Action::Hold,
            _ => Action::Right,
        },
        PolicyKind::Hold => Action::Hold,
        PolicyKind::Left => Action::Left,
        PolicyKind::Right => Action::Right,
        PolicyKind::Dodge => dodge(observation),
    }
}

fn run(cli: Cli) -> Result<(), EnvError> {
    let mut config = match &cli.config {
        Some(path) => EnvConfig::load(path)?,
        None => EnvConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let mut policy_rng = Pcg32::seed_from_u64(config.seed.wrapping_add(1));
    let mut env = Environment::new(config)?;

    for episode in 0..cli.episodes {
        let mut observation = env.reset()?;
        let mut total_reward = 0.0;

        while env.frame() < cli.max_steps {
            let action = choose(cli.policy, &observation, &mut policy_rng);
            let result = env.step(action)?;
            total_reward += result.reward;
            if cli.json {
                println!("{}", serde_json::to_string(&result)?);
            }
            observation = result.observation;
            if result.done {
                break;
            }
        }

        log::info!(
            "Episode {}: survived {} frames, reward {:.0}, {}",
            episode,
            env.frame(),
            total_reward,
            if env.is_done() { "hit" } else { "timed out" }
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
