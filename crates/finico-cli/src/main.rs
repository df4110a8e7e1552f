mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::budget::{BudgetArgs, NetWorthArgs};
use commands::forecast::ProjectArgs;
use commands::goal::{GoalDeterministicArgs, SolveContributionArgs};
use commands::loan::AmortizeArgs;
use commands::monte_carlo::MonteCarloArgs;
use commands::rates::ConvertRateArgs;
use config::CliConfig;

/// Personal-finance projections, Monte Carlo goals and loan schedules
#[derive(Parser)]
#[command(
    name = "finico",
    version,
    about = "Personal-finance projections, Monte Carlo goals and loan schedules",
    long_about = "Deterministic and Monte Carlo wealth projections with fees, inflation \
                  and contribution escalation; required-contribution solvers; loan \
                  amortization; budget and net-worth summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to the config's default_output, then json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Path to a YAML config file (defaults to ./finico.yaml if present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Deterministic monthly projection with fees, inflation and escalation
    Project(ProjectArgs),
    /// Monte Carlo wealth simulation with percentile bands and goal odds
    MonteCarlo(MonteCarloArgs),
    /// Monthly contribution needed to hit a goal with a given probability
    SolveContribution(SolveContributionArgs),
    /// Closed-form monthly contribution for a deterministic goal
    GoalDeterministic(GoalDeterministicArgs),
    /// Loan amortization schedule (solve payment or term)
    Amortize(AmortizeArgs),
    /// Monthly budget totals and savings rate
    Budget(BudgetArgs),
    /// Net worth from assets and liabilities
    NetWorth(NetWorthArgs),
    /// Convert between annual and monthly rates
    ConvertRate(ConvertRateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(log_level: &str, verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    init_tracing(&config.log_level, cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::forecast::run_project(args),
        Commands::MonteCarlo(args) => commands::monte_carlo::run_monte_carlo(args, &config),
        Commands::SolveContribution(args) => {
            commands::goal::run_solve_contribution(args, &config)
        }
        Commands::GoalDeterministic(args) => commands::goal::run_goal_deterministic(args),
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::Budget(args) => commands::budget::run_budget(args),
        Commands::NetWorth(args) => commands::budget::run_net_worth(args),
        Commands::ConvertRate(args) => commands::rates::run_convert_rate(args),
        Commands::Version => {
            println!("finico {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let format = cli
        .output
        .or(config.default_output)
        .unwrap_or(OutputFormat::Json);

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
