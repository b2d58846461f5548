use bvopt::config::{Config, MinimizeEncoding, MoveFamilies, SearchParams};
use bvopt::model::Signature;
use bvopt::tracker::AssertionTracker;
use bvopt::{DefaultOptimizer, OptimizationOptions, SlsError};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::Write;
use std::time::Duration;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: Config,
}

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let matches = TestCli::command()
        .try_get_matches_from(std::iter::once("bvopt").chain(args.iter().copied()))
        .unwrap();
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", json).unwrap();
    file
}

#[test]
fn test_cli_defaults_match_serde_defaults() {
    let (cli, _) = parse(&[]);
    let from_json: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(cli.search.max_restarts, from_json.search.max_restarts);
    assert_eq!(cli.search.time_limit_secs, from_json.search.time_limit_secs);
    assert_eq!(cli.search.minimize_encoding, MinimizeEncoding::Negate);
    assert_eq!(cli.moves, MoveFamilies::default());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(r#"{ "search": { "max_restarts": 7 }, "moves": { "enable_mul3": false } }"#);
    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.search.max_restarts, 7);
    assert_eq!(config.search.walk_steps, SearchParams::default().walk_steps);
    assert!(!config.moves.enable_mul3);
    assert!(config.moves.enable_mul2_div2);
}

#[test]
fn test_cli_flags_override_file() {
    let file = write_config(
        r#"{ "search": { "max_restarts": 7, "seed": 3, "minimize_encoding": "complement" } }"#,
    );
    let mut config = Config::load_from_file(file.path()).unwrap();
    let (cli, matches) = parse(&["--seed", "99", "--enable-unary-minus", "false"]);
    config.merge_from_cli(&cli, &matches);

    assert_eq!(config.search.seed, Some(99));
    assert!(!config.moves.enable_unary_minus);
    // Not given on the command line: the file value stays.
    assert_eq!(config.search.max_restarts, 7);
    assert_eq!(config.search.minimize_encoding, MinimizeEncoding::Complement);
}

#[test]
fn test_out_of_range_noise_is_rejected() {
    let file = write_config(r#"{ "search": { "walk_noise": 2.0 } }"#);
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(SlsError::Config(_))
    ));
}

#[test]
fn test_missing_file_is_a_config_error() {
    let err = Config::load_from_file("/nonexistent/bvopt.json").unwrap_err();
    assert!(err.to_string().contains("bvopt.json"));
}

#[test]
fn test_time_limit_beyond_timer_range_is_rejected() {
    let mut config = Config::default();
    config.search.time_limit_secs = 1e20;
    assert!(matches!(config.validate(), Err(SlsError::Config(_))));

    // Options built without validation saturate instead of panicking.
    let options = OptimizationOptions::from(&config);
    assert_eq!(options.time_limit, Duration::MAX);
}

#[test]
fn test_move_families_reach_feasibility_walk() {
    let (mut cli, _) = parse(&[]);
    cli.moves = MoveFamilies::minimal();
    let hard = AssertionTracker::new(&Signature::new(), vec![]);
    let optimizer = DefaultOptimizer::with_config(hard, &cli);
    assert_eq!(optimizer.constraint_search().catalog().len(), 1);
}
