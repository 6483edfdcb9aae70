use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use playoff_odds::config::EngineConfig;
use playoff_odds::sample_league;
use playoff_odds::state::{ProbabilityResult, SimulationReport, StandingsFeed};
use playoff_odds::SimulationEngine;

const DEMO_TEAMS: usize = 12;
const DEMO_WEEKS: u32 = 14;
const DEMO_CURRENT_WEEK: u32 = 10;
const DEMO_PLAYOFF_SPOTS: u32 = 6;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let mut config = EngineConfig::from_env();
    if let Some(n) = parse_arg::<usize>("--sims") {
        config.simulation_count = n;
    }
    if let Some(seed) = parse_arg::<u64>("--seed") {
        config.seed = Some(seed);
    }

    let feed = if has_flag("--demo") {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        sample_league::generate_league(
            DEMO_TEAMS,
            DEMO_WEEKS,
            DEMO_CURRENT_WEEK,
            DEMO_PLAYOFF_SPOTS,
            &mut rng,
        )
    } else {
        let path = standings_path_arg()
            .ok_or_else(|| anyhow!("usage: playoff_odds <standings.json> | --demo [--sims N] [--seed N] [--json]"))?;
        load_feed(&path)?
    };

    let engine = SimulationEngine::seeded(config);
    let results = engine
        .simulate(&feed.teams, &feed.settings)
        .context("failed to calculate playoff odds")?;

    if has_flag("--json") {
        let report = SimulationReport {
            generated_at: Utc::now(),
            simulation_count: config.simulation_count,
            seed: config.seed,
            settings: feed.settings,
            results,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        print_table(&feed, &results, config.simulation_count);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_feed(path: &Path) -> Result<StandingsFeed> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read standings file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid standings json in {}", path.display()))
}

fn print_table(feed: &StandingsFeed, results: &[ProbabilityResult], sims: usize) {
    let s = &feed.settings;
    println!(
        "Week {}/{} | {} playoff spots | {} simulations",
        s.current_week, s.regular_season_weeks, s.playoff_spots, sims
    );
    if results.is_empty() {
        println!("Nothing to simulate");
        return;
    }

    let mut rows: Vec<&ProbabilityResult> = results.iter().collect();
    rows.sort_by(|a, b| {
        b.playoff_probability
            .total_cmp(&a.playoff_probability)
            .then(b.championship_probability.total_cmp(&a.championship_probability))
    });

    println!(
        "{:<24} {:>8} {:>9} {:>9} {:>11}",
        "Team", "Record", "Playoff", "#1 Seed", "Projected"
    );
    for r in rows {
        let name = r.team_name.as_deref().unwrap_or(&r.team_id);
        println!(
            "{:<24} {:>8} {:>9} {:>9} {:>11}",
            truncate(name, 24),
            r.current_record,
            r.playoff_display(),
            r.championship_display(),
            r.projected_record()
        );
        for line in r.clinch_scenarios.iter().chain(&r.elimination_scenarios) {
            println!("    - {line}");
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

fn standings_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--sims" || arg == "--seed" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        let trimmed = arg.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

fn parse_arg<T: FromStr>(name: &str) -> Option<T> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<T>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<T>()
        {
            return Some(v);
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
