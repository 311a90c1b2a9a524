//! screen-capture CLI entry point

use std::process::ExitCode;

use clap::Parser;

use screen_capture::cli::{
    app::{load_merged_config, log_filter, run_interactive, EXIT_ERROR},
    args::{CaptureRunOptions, Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use screen_capture::domain::capture::DisplaySurface;
use screen_capture::domain::config::{AppConfig, LinuxConfig};
use screen_capture::infrastructure::XdgConfigStore;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        surface: cli
            .surface
            .map(|s| DisplaySurface::from(s).as_str().to_string()),
        framerate: cli.framerate,
        output_dir: cli
            .output_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        linux: cli.display.clone().map(|display| LinuxConfig {
            display: Some(display),
        }),
    };

    // Merge config
    let config = match load_merged_config(cli_config).await {
        Ok(config) => config,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let options = CaptureRunOptions {
        capture: config.capture_options(),
        output_dir: config.output_dir_or_default(),
        display: config.display().map(str::to_string),
    };

    run_interactive(options).await
}
