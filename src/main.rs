use bvopt::config::Config;
use bvopt::problem::Problem;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with search parameters. Flags given on the command line win.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Check(cmd::check::CheckArgs),
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.debug);

    let problem_path = match &cli.command {
        Commands::Optimize(args) => &args.problem,
        Commands::Check(args) => &args.problem,
    };
    info!("📂 Loading Problem: {}", problem_path);
    let problem = Problem::load_from_file(problem_path).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Optimize(args) => {
            let sub_matches = matches
                .subcommand_matches("optimize")
                .unwrap_or(&matches);

            let config = match &cli.config {
                Some(path) => {
                    info!("⚖️  Loading Config from: {}", path);
                    let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                        error!("❌ {}", e);
                        process::exit(1);
                    });
                    file_config.merge_from_cli(&args.config, sub_matches);
                    file_config
                }
                None => args.config.clone(),
            };
            if let Err(e) = config.validate() {
                error!("❌ {}", e);
                process::exit(1);
            }
            let direction = args.direction().unwrap_or(problem.direction);

            if let Err(e) = cmd::optimize::run(&problem, &config, direction) {
                error!("\n❌ FATAL ERROR DURING OPTIMIZATION:");
                error!("   {}", e);
                process::exit(1);
            }
        }
        Commands::Check(args) => cmd::check::run(args, &problem),
    }
}
