mod commands;

use clap::{Parser, Subcommand};
use redat::config::Config;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "redat-cli", version, about = "Client for the Redat taxi fare service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up the fare between two stations and render the route map
    Map {
        /// Start station name
        #[arg(long)]
        from: String,
        /// End station name
        #[arg(long)]
        to: String,
        /// Where to write the map page
        #[arg(long, default_value = "route-map.html")]
        out: PathBuf,
        /// Ask the price accuracy question after showing the fare
        #[arg(long)]
        feedback: bool,
    },
    /// List every station known to the backend
    Stations,
    /// Submit a new route contribution
    Contribute(commands::ContributeArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match cli.command {
        Command::Map {
            from,
            to,
            out,
            feedback,
        } => commands::map(&config, &from, &to, &out, feedback).await,
        Command::Stations => commands::stations(&config).await,
        Command::Contribute(args) => commands::contribute(&config, args).await,
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}
