use std::fs;
use std::path::PathBuf;

use playoff_odds::config::EngineConfig;
use playoff_odds::state::StandingsFeed;
use playoff_odds::{
    LeagueSimulationSettings, SimError, SimulationEngine, SimulationOptions, TeamSeasonState,
    simulate,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn week11_league() -> StandingsFeed {
    serde_json::from_str(&read_fixture("week11_league.json")).expect("fixture should parse")
}

fn settings(spots: u32, weeks: u32, current: u32) -> LeagueSimulationSettings {
    LeagueSimulationSettings {
        playoff_spots: spots,
        regular_season_weeks: weeks,
        current_week: current,
    }
}

#[test]
fn finished_season_is_deterministic_without_randomness() {
    let teams = vec![
        TeamSeasonState::new("A", 3, 0, 330.0),
        TeamSeasonState::new("B", 2, 1, 310.0),
        TeamSeasonState::new("C", 1, 2, 295.0),
        TeamSeasonState::new("D", 0, 3, 280.0),
    ];
    // No seed: the answer cannot depend on the draws.
    let results = simulate(&teams, &settings(2, 4, 4), &SimulationOptions::default())
        .expect("valid league");

    let playoff: Vec<f64> = results.iter().map(|r| r.playoff_probability).collect();
    assert_eq!(playoff, vec![100.0, 100.0, 0.0, 0.0]);
    assert_eq!(results[0].championship_probability, 100.0);
    assert_eq!(results[1].championship_probability, 0.0);
    assert_eq!(results[0].projected_wins, 3.0);
    assert_eq!(results[3].projected_losses, 3.0);
    assert_eq!(results[1].current_record, "2-1");
    assert_eq!(results[0].playoff_display(), "100.0%");
    assert!(results[2].is_eliminated());
    assert!(results[3].is_eliminated());
}

#[test]
fn fixed_seed_is_reproducible() {
    let feed = week11_league();
    let opts = SimulationOptions::seeded(4_000, 2026);
    let first = simulate(&feed.teams, &feed.settings, &opts).unwrap();
    let second = simulate(&feed.teams, &feed.settings, &opts).unwrap();
    assert_eq!(first, second);

    let other = simulate(&feed.teams, &feed.settings, &SimulationOptions::seeded(4_000, 7)).unwrap();
    assert_ne!(first, other);
}

#[test]
fn probabilities_stay_in_bounds() {
    let feed = week11_league();
    let results = simulate(&feed.teams, &feed.settings, &SimulationOptions::seeded(5_000, 1)).unwrap();
    assert_eq!(results.len(), 10);

    let mut playoff_total = 0.0;
    let mut title_total = 0.0;
    for r in &results {
        assert!((0.0..=100.0).contains(&r.playoff_probability));
        assert!((0.0..=100.0).contains(&r.championship_probability));
        assert!(r.championship_probability <= r.playoff_probability);
        let seeds: f64 = r.seed_probabilities.iter().sum();
        assert!((seeds - 100.0).abs() < 1e-6);
        assert!((r.projected_wins + r.projected_losses - 14.0).abs() < 1e-9);
        playoff_total += r.playoff_probability;
        title_total += r.championship_probability;
    }
    // Every trial fills exactly four spots and one title.
    assert!((playoff_total - 400.0).abs() < 1e-6);
    assert!((title_total - 100.0).abs() < 1e-6);
}

#[test]
fn scenarios_agree_with_simulation() {
    let feed = week11_league();
    let results =
        simulate(&feed.teams, &feed.settings, &SimulationOptions::seeded(10_000, 3)).unwrap();

    let leader = &results[0];
    assert_eq!(leader.team_name.as_deref(), Some("Gridiron Gurus"));
    assert_eq!(leader.clinch_scenarios[0], "Clinched a playoff spot");
    assert_eq!(leader.playoff_probability, 100.0);

    let cellar = &results[9];
    assert!(cellar.is_eliminated());
    assert!(cellar.clinch_scenarios.is_empty());
    assert_eq!(cellar.playoff_probability, 0.0);

    for r in &results {
        if r.is_eliminated() {
            assert_eq!(r.playoff_probability, 0.0, "{} is eliminated", r.team_id);
        }
        if r.clinch_scenarios.iter().any(|s| s == "Clinched a playoff spot") {
            assert_eq!(r.playoff_probability, 100.0, "{} has clinched", r.team_id);
        }
    }
}

#[test]
fn better_team_with_same_schedule_fares_better() {
    let teams = vec![
        TeamSeasonState::new("strong", 6, 4, 1260.0).with_schedule(["c", "d", "e", "f"]),
        TeamSeasonState::new("weak", 5, 5, 1180.0).with_schedule(["c", "d", "e", "f"]),
        TeamSeasonState::new("c", 6, 4, 1210.0),
        TeamSeasonState::new("d", 5, 5, 1200.0),
        TeamSeasonState::new("e", 4, 6, 1150.0),
        TeamSeasonState::new("f", 4, 6, 1100.0),
    ];
    let results = simulate(&teams, &settings(3, 14, 10), &SimulationOptions::seeded(20_000, 17)).unwrap();
    assert!(results[0].playoff_probability + 1.0 >= results[1].playoff_probability);
    assert!(results[0].projected_wins > results[1].projected_wins);
}

#[test]
fn results_do_not_depend_on_thread_count() {
    let feed = week11_league();
    let run = |threads: usize| {
        let config = EngineConfig {
            simulation_count: 3_000,
            seed: Some(44),
            parallelism: threads,
            ..EngineConfig::default()
        };
        SimulationEngine::seeded(config)
            .simulate(&feed.teams, &feed.settings)
            .unwrap()
    };
    assert_eq!(run(1), run(8));
}

#[test]
fn caller_input_is_left_untouched() {
    let feed = week11_league();
    let before = feed.teams.clone();
    let _ = simulate(&feed.teams, &feed.settings, &SimulationOptions::seeded(500, 9)).unwrap();
    assert_eq!(feed.teams, before);
}

#[test]
fn invalid_settings_fail_fast() {
    let feed = week11_league();
    let cases = [
        settings(0, 14, 11),
        settings(11, 14, 11),
        settings(4, 14, 15),
        settings(4, 0, 0),
    ];
    for bad in cases {
        let err = simulate(&feed.teams, &bad, &SimulationOptions::seeded(100, 1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidSettings { .. }), "{bad:?} -> {err}");
    }
}

#[test]
fn empty_league_or_zero_trials_yield_nothing() {
    let none = simulate(&[], &settings(4, 14, 11), &SimulationOptions::default()).unwrap();
    assert!(none.is_empty());

    let feed = week11_league();
    let zero = simulate(&feed.teams, &feed.settings, &SimulationOptions::seeded(0, 1)).unwrap();
    assert!(zero.is_empty());
}

#[test]
fn missing_schedules_are_projected() {
    let mut feed = week11_league();
    for t in &mut feed.teams {
        t.remaining_schedule.clear();
    }
    let weeks = feed.settings.regular_season_weeks as f64;
    let results = simulate(&feed.teams, &feed.settings, &SimulationOptions::seeded(1_000, 5)).unwrap();
    for r in &results {
        let played = r.projected_wins + r.projected_losses;
        assert!((played - weeks).abs() < 1e-9, "{} played {played}", r.team_id);
    }
}

#[test]
fn fully_projected_even_league_keeps_season_length() {
    let teams: Vec<TeamSeasonState> = (0..10)
        .map(|i| TeamSeasonState::new(format!("t{i}"), 5, 5, 1000.0))
        .collect();
    let results = simulate(&teams, &settings(4, 14, 10), &SimulationOptions::seeded(2_000, 1)).unwrap();
    for r in &results {
        assert!(
            (r.projected_wins + r.projected_losses - 14.0).abs() < 1e-9,
            "{} finished {}",
            r.team_id,
            r.projected_record()
        );
    }
    let playoff_total: f64 = results.iter().map(|r| r.playoff_probability).sum();
    assert!((playoff_total - 400.0).abs() < 1e-6);
}

#[test]
fn oversized_records_are_rejected() {
    let teams = vec![
        TeamSeasonState::new("a", u32::MAX, 0, 100.0),
        TeamSeasonState::new("b", 5, 5, 1000.0),
    ];
    let err = simulate(&teams, &settings(1, 14, 10), &SimulationOptions::seeded(10, 1)).unwrap_err();
    assert!(matches!(err, SimError::InvalidTeam { .. }), "{err}");
}
