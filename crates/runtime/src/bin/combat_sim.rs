//! Runs a scripted skirmish and prints a JSON summary to stdout.
//!
//! Settings come from the environment (a `.env` file is honored):
//!
//! - `COMBAT_DATA_DIR`: directory with `config.toml`, `skills.ron` and
//!   `scenarios/`; missing files fall back to the embedded defaults
//! - `COMBAT_SCENARIO`: scenario name, `skirmish` by default
//! - `COMBAT_RULESET`, `COMBAT_SEED`: override the loaded config
//! - `COMBAT_LOG_DIR`: also write logs to this directory; an empty value
//!   picks the platform cache directory
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context as _, Result, anyhow};
use serde::Serialize;

use combat_content::ContentFactory;
use combat_core::{CastOutcome, ClassifiedError, Ruleset};
use combat_runtime::{
    Actor, CastRequest, LogConfig, Runtime, RuntimeConfig, TickReport, WorldSnapshot, logging,
};

struct Settings {
    data_dir: PathBuf,
    scenario: String,
    ruleset: Option<Ruleset>,
    seed: Option<u64>,
    log_dir: Option<PathBuf>,
}

impl Settings {
    fn from_env() -> Result<Self> {
        let ruleset = std::env::var("COMBAT_RULESET")
            .ok()
            .map(|value| {
                Ruleset::from_str(&value).map_err(|_| {
                    anyhow!("COMBAT_RULESET must be `classic` or `renewal`, got `{value}`")
                })
            })
            .transpose()?;
        let seed = std::env::var("COMBAT_SEED")
            .ok()
            .map(|value| value.parse::<u64>())
            .transpose()
            .context("COMBAT_SEED must be an unsigned integer")?;

        Ok(Self {
            data_dir: std::env::var_os("COMBAT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            scenario: std::env::var("COMBAT_SCENARIO").unwrap_or_else(|_| "skirmish".to_owned()),
            ruleset,
            seed,
            log_dir: match std::env::var("COMBAT_LOG_DIR") {
                Ok(dir) if dir.is_empty() => LogConfig::default_log_dir(),
                Ok(dir) => Some(PathBuf::from(dir)),
                Err(_) => None,
            },
        })
    }
}

#[derive(Debug, Default, Serialize)]
struct CastTally {
    completed: usize,
    deferred: usize,
    rejected: usize,
    /// Rejections keyed by error code.
    rejections: BTreeMap<&'static str, usize>,
}

impl CastTally {
    fn record(&mut self, outcome: &CastOutcome) {
        match outcome {
            CastOutcome::Completed(_) => self.completed += 1,
            CastOutcome::Deferred(_) => self.deferred += 1,
            CastOutcome::Rejected { error, .. } => {
                self.rejected += 1;
                *self.rejections.entry(error.error_code()).or_default() += 1;
            }
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct TickTally {
    resumed: usize,
    invalidated: usize,
    pulsed: usize,
    units_expired: usize,
    statuses_ended: usize,
}

impl TickTally {
    fn record(&mut self, report: &TickReport) {
        self.resumed += report.resumed;
        self.invalidated += report.invalidated;
        self.pulsed += report.pulsed;
        self.units_expired += report.units_expired;
        self.statuses_ended += report.statuses_ended;
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    scenario: String,
    ruleset: Ruleset,
    seed: u64,
    casts: CastTally,
    ticks: TickTally,
    world: WorldSnapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let settings = Settings::from_env()?;
    let mut log_config = LogConfig::default();
    if let Some(dir) = &settings.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    let _log_guard = logging::init(&log_config)?;

    let factory = ContentFactory::new(&settings.data_dir);
    let mut combat = factory.load_config()?;
    if let Some(ruleset) = settings.ruleset {
        combat = combat.with_ruleset(ruleset);
    }
    if let Some(seed) = settings.seed {
        combat = combat.with_seed(seed);
    }
    let limits = factory.load_skill_limits()?;
    let scenario = factory.load_scenario(&settings.scenario)?;

    tracing::info!(
        target: "runtime::sim",
        scenario = %scenario.name,
        actors = scenario.actors.len(),
        casts = scenario.casts.len(),
        "starting scenario"
    );

    let runtime = Runtime::builder()
        .config(RuntimeConfig::new(combat.clone()))
        .skill_limits(limits)
        .actors(scenario.actors.iter().map(Actor::from_spec))
        .build()
        .await?;
    let handle = runtime.handle();

    let mut casts = CastTally::default();
    let mut ticks = TickTally::default();
    for tick in 0..=scenario.last_tick() {
        for cast in scenario.casts_at(tick) {
            let outcome = handle.cast(CastRequest::from(cast)).await?;
            casts.record(&outcome);
        }
        for report in handle.advance(1).await? {
            ticks.record(&report);
        }
    }

    let summary = Summary {
        scenario: scenario.name.clone(),
        ruleset: combat.ruleset,
        seed: combat.rng_seed,
        casts,
        ticks,
        world: handle.query_world().await?,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    drop(handle);
    runtime.shutdown().await?;
    Ok(())
}
