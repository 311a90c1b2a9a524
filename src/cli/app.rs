//! Interactive session runner

use std::process::ExitCode;

use tracing::{debug, info};

use crate::application::ports::{ConfigStore, DisplaySource, FileSaveSink, RecorderSink};
use crate::application::{CaptureController, SaveOutcome, StartOutcome};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::infrastructure::{
    FfmpegRecorder, FsFileSaveSink, TerminalPreview, X11DisplaySource, XdgConfigStore,
};

use super::args::CaptureRunOptions;
use super::commands::UserCommand;
use super::presenter::Presenter;
use super::signals::{SessionSignal, SessionSignalHandler};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Diagnostics filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "screen_capture=warn";

/// Tracing filter from `RUST_LOG`, falling back to warnings from this crate
pub fn log_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
}

type Controller<S, R, F> = CaptureController<S, R, F, TerminalPreview>;

/// Run the interactive capture session on stdin
pub async fn run_interactive(options: CaptureRunOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let mut signals = match SessionSignalHandler::new() {
        Ok(handler) => handler,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Create adapters
    let source = X11DisplaySource::with_display(options.display.clone());
    let recorder = FfmpegRecorder::new();
    let saver = FsFileSaveSink::new(options.output_dir.clone());
    let preview = TerminalPreview::new();

    let mut controller =
        CaptureController::with_options(source, recorder, saver, preview, options.capture);

    info!(
        surface = %controller.options().video.display_surface,
        output_dir = %options.output_dir.display(),
        "interactive session started"
    );
    presenter.info("Type 'start' to pick a window, 'help' for all commands");

    let mut last_seen = controller.log().last_seq();
    loop {
        presenter.prompt();

        let signal = match signals.recv().await {
            Some(signal) => signal,
            None => break,
        };

        match signal {
            SessionSignal::Command(UserCommand::Quit)
            | SessionSignal::Shutdown
            | SessionSignal::InputClosed => {
                debug!(?signal, "leaving session");
                break;
            }
            SessionSignal::Command(command) => {
                dispatch(&mut controller, &mut presenter, command).await;
            }
            SessionSignal::Invalid(line) => {
                presenter.warn(&format!(
                    "Unknown command: \"{}\". Type 'help' for a list of commands",
                    line
                ));
            }
        }

        for line in controller.log().since(last_seen) {
            presenter.log_line(line);
        }
        last_seen = controller.log().last_seq();
    }

    controller.stop_capture();
    ExitCode::from(EXIT_SUCCESS)
}

async fn dispatch<S, R, F>(
    controller: &mut Controller<S, R, F>,
    presenter: &mut Presenter,
    command: UserCommand,
) where
    S: DisplaySource,
    R: RecorderSink,
    F: FileSaveSink,
{
    if !is_enabled(controller, command) {
        presenter.warn(&format!("'{}' is not available right now", command));
        return;
    }

    match command {
        UserCommand::Start => {
            presenter.start_spinner("Select the window to capture...");
            let outcome = controller.start_capture().await;
            presenter.stop_spinner();
            match outcome {
                Ok(StartOutcome::Started) => presenter.success("Capturing. Type 'stop' to finish"),
                Ok(StartOutcome::Failed) => {}
                Err(e) => presenter.error(&e.to_string()),
            }
        }
        UserCommand::Stop => {
            controller.stop_capture();
            presenter.success(&format!(
                "Capture stopped ({} segment(s) recorded)",
                controller.segment_count()
            ));
        }
        UserCommand::Save => match controller.save_recording().await {
            Ok(SaveOutcome::Saved(path)) => {
                presenter.success(&format!("Saved to {}", path.display()))
            }
            Ok(SaveOutcome::NoData) | Ok(SaveOutcome::Failed) => {}
            Err(e) => presenter.error(&e.to_string()),
        },
        UserCommand::Status => {
            let live = controller.preview().describe();
            presenter.status(
                controller.state(),
                controller.segment_count(),
                controller.recorded_bytes(),
                live.as_deref(),
            );
        }
        UserCommand::Log => {
            if controller.log().is_empty() {
                presenter.info("Log is empty");
            }
            for line in controller.log().lines() {
                presenter.log_line(line);
            }
        }
        UserCommand::Help => {
            let controller = &*controller;
            presenter.help(|c| is_enabled(controller, c));
        }
        UserCommand::Quit => {}
    }
}

/// Whether a command is currently allowed, mirroring the enabled/disabled
/// state of the start, stop and save controls
fn is_enabled<S, R, F>(controller: &Controller<S, R, F>, command: UserCommand) -> bool
where
    S: DisplaySource,
    R: RecorderSink,
    F: FileSaveSink,
{
    match command {
        UserCommand::Start => controller.can_start(),
        UserCommand::Stop => controller.can_stop(),
        UserCommand::Save => controller.can_save(),
        UserCommand::Status | UserCommand::Log | UserCommand::Help | UserCommand::Quit => true,
    }
}

/// Load and merge configuration from file and CLI.
///
/// A missing file is fine; one that cannot be read or parsed, or that
/// holds invalid values, is an error.
pub async fn load_merged_config(cli_config: AppConfig) -> Result<AppConfig, ConfigError> {
    let store = XdgConfigStore::new();
    load_merged_config_from(&store, cli_config).await
}

async fn load_merged_config_from<S: ConfigStore>(
    store: &S,
    cli_config: AppConfig,
) -> Result<AppConfig, ConfigError> {
    let file_config = store.load().await?;
    file_config.validate()?;

    // Merge: defaults < file < cli
    let config = AppConfig::defaults().merge(file_config).merge(cli_config);
    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}
