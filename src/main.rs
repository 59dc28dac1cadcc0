mod feed;
mod scene;
mod trajectory;
mod viewer;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::viewer::Config;

#[derive(Parser)]
#[command(name = "sat-o-scope")]
#[command(about = "Live satellite trajectories on a 3D globe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file
    Validate { config: String },
    /// Poll the feed and run the viewer
    Run { config: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Run { config } => run(&config),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    println!("Config is valid");
    println!(
        "  feed: {} every {}",
        config.feed.url,
        humantime::format_duration(config.feed.poll_interval)
    );
    println!(
        "  scene: path width {}, interpolation degree {}",
        config.scene.path_width, config.scene.interpolation_degree
    );
    ExitCode::SUCCESS
}

fn run(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(viewer::run_viewer(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Viewer error: {}", e);
            ExitCode::FAILURE
        }
    }
}
