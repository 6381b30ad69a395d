use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "noscroll-cli", version, about = "NoScroll CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User preference management
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Daily puzzle counts
    Counts {
        #[command(subcommand)]
        action: commands::counts::CountsAction,
    },
    /// Focus gate control
    Gate {
        #[command(subcommand)]
        action: commands::gate::GateAction,
    },
    /// Puzzle feed access
    Puzzles {
        #[command(subcommand)]
        action: commands::puzzles::PuzzlesAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Counts { action } => commands::counts::run(action),
        Commands::Gate { action } => commands::gate::run(action),
        Commands::Puzzles { action } => commands::puzzles::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
