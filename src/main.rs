//! Main application entry point.
//!
//! Parses the command line, sets up file logging and the configuration
//! directory, then hands off to the matching command. The process exit code
//! is 0 after a completed pass, even when individual lamps failed, and 1 when
//! the pass could not run at all.

use lampor::args::{CliAction, ParsedArgs};
use lampor::commands::{devices, help, preview, run, sun};
use lampor::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use lampor::common::logger::Log;
use lampor::config;
use lampor::{log_end, log_error_exit, log_indented, log_version};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args());
    std::process::exit(dispatch(parsed.action));
}

fn dispatch(action: CliAction) -> i32 {
    match action {
        CliAction::ShowHelp => {
            help::display_help();
            EXIT_SUCCESS
        }
        CliAction::ShowVersion => {
            help::display_version_info();
            EXIT_SUCCESS
        }
        CliAction::ShowHelpDueToError => {
            help::display_help();
            EXIT_FAILURE
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            at,
            dry_run,
            log_file,
        } => {
            // Held until the end of the run so the writer thread flushes
            let _log_guard = match log_file.map(Log::start_file_logging).transpose() {
                Ok(guard) => guard,
                Err(e) => return fail(&e),
            };
            if let Err(e) = config::set_config_dir(config_dir) {
                return fail(&e);
            }

            log_version!();
            let options = run::RunOptions {
                debug_enabled,
                at,
                dry_run,
            };
            match run::handle_run_command(&options) {
                Ok(_) => {
                    log_end!();
                    EXIT_SUCCESS
                }
                Err(e) => fail(&e),
            }
        }
        CliAction::Sun {
            debug_enabled,
            config_dir,
            date,
        } => with_config_dir(config_dir, || {
            sun::handle_sun_command(date.as_deref(), debug_enabled)
        }),
        CliAction::Preview {
            debug_enabled,
            config_dir,
            date,
            step_minutes,
        } => with_config_dir(config_dir, || {
            preview::handle_preview_command(date.as_deref(), step_minutes, debug_enabled)
        }),
        CliAction::Devices {
            debug_enabled,
            config_dir,
        } => with_config_dir(config_dir, || devices::handle_devices_command(debug_enabled)),
    }
}

fn with_config_dir(config_dir: Option<String>, command: impl FnOnce() -> anyhow::Result<()>) -> i32 {
    if let Err(e) = config::set_config_dir(config_dir) {
        return fail(&e);
    }
    log_version!();
    match command() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(error: &anyhow::Error) -> i32 {
    log_error_exit!("{}", error);
    for cause in error.chain().skip(1) {
        log_indented!("Caused by: {}", cause);
    }
    log_end!();
    EXIT_FAILURE
}
