//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Global flags (`--debug`,
//! `--config`) may appear anywhere; command-specific flags are only accepted
//! after or around their command. Anything unrecognised shows the help text
//! and exits non-zero.

use crate::common::constants::DEFAULT_PREVIEW_STEP_MINUTES;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run one tick over all lamps
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        at: Option<String>,
        dry_run: bool,
        log_file: Option<String>,
    },
    /// Print the sun window and phase boundaries for a date
    Sun {
        debug_enabled: bool,
        config_dir: Option<String>,
        date: Option<String>,
    },
    /// Print targets across a day without touching any lamp
    Preview {
        debug_enabled: bool,
        config_dir: Option<String>,
        date: Option<String>,
        step_minutes: u32,
    },
    /// List lamps and their observed state
    Devices {
        debug_enabled: bool,
        config_dir: Option<String>,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Run,
    Sun,
    Preview,
    Devices,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Help and version take precedence over everything else
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return Self::action(CliAction::ShowHelp);
        }
        if args_vec.iter().any(|arg| arg == "--version" || arg == "-V") {
            return Self::action(CliAction::ShowVersion);
        }

        match Self::parse_command(&args_vec) {
            Some(action) => Self::action(action),
            None => Self::action(CliAction::ShowHelpDueToError),
        }
    }

    fn action(action: CliAction) -> ParsedArgs {
        ParsedArgs { action }
    }

    /// Walk the arguments once; `None` means they do not form a valid command line.
    fn parse_command(args: &[String]) -> Option<CliAction> {
        let mut command: Option<Command> = None;
        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut at: Option<String> = None;
        let mut dry_run = false;
        let mut log_file: Option<String> = None;
        let mut step_minutes: Option<u32> = None;
        let mut date: Option<String> = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => config_dir = Some(iter.next()?.clone()),
                "--at" => at = Some(iter.next()?.clone()),
                "--dry-run" => dry_run = true,
                "--log" => log_file = Some(iter.next()?.clone()),
                "--step" => step_minutes = Some(parse_step(iter.next()?)?),
                flag if flag.starts_with('-') => return None,
                word => match command {
                    None => {
                        command = Some(match word {
                            "run" => Command::Run,
                            "sun" => Command::Sun,
                            "preview" => Command::Preview,
                            "devices" => Command::Devices,
                            _ => return None,
                        })
                    }
                    // A single positional date after sun/preview
                    Some(Command::Sun | Command::Preview) if date.is_none() => {
                        date = Some(word.to_string())
                    }
                    Some(_) => return None,
                },
            }
        }

        let command = command.unwrap_or(Command::Run);
        let run_flags_used = at.is_some() || dry_run || log_file.is_some();

        match command {
            Command::Run => Some(CliAction::Run {
                debug_enabled,
                config_dir,
                at,
                dry_run,
                log_file,
            }),
            Command::Sun if !run_flags_used && step_minutes.is_none() => Some(CliAction::Sun {
                debug_enabled,
                config_dir,
                date,
            }),
            Command::Preview if !run_flags_used => Some(CliAction::Preview {
                debug_enabled,
                config_dir,
                date,
                step_minutes: step_minutes.unwrap_or(DEFAULT_PREVIEW_STEP_MINUTES),
            }),
            Command::Devices if !run_flags_used && step_minutes.is_none() => {
                Some(CliAction::Devices {
                    debug_enabled,
                    config_dir,
                })
            }
            _ => None,
        }
    }
}

fn parse_step(value: &str) -> Option<u32> {
    value
        .parse::<u32>()
        .ok()
        .filter(|step| (1..=720).contains(step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["lampor"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_no_arguments_runs_one_tick() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
                at: None,
                dry_run: false,
                log_file: None,
            }
        );
    }

    #[test]
    fn test_run_flags() {
        assert_eq!(
            parse(&["run", "-d", "--at", "06:45", "--dry-run", "--log", "/tmp/lampor.log"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: None,
                at: Some("06:45".to_string()),
                dry_run: true,
                log_file: Some("/tmp/lampor.log".to_string()),
            }
        );
    }

    #[test]
    fn test_global_flags_before_command() {
        assert_eq!(
            parse(&["--config", "/etc/lampor", "devices"]),
            CliAction::Devices {
                debug_enabled: false,
                config_dir: Some("/etc/lampor".to_string()),
            }
        );
    }

    #[test]
    fn test_sun_with_date() {
        assert_eq!(
            parse(&["sun", "2024-06-21"]),
            CliAction::Sun {
                debug_enabled: false,
                config_dir: None,
                date: Some("2024-06-21".to_string()),
            }
        );
    }

    #[test]
    fn test_preview_step() {
        assert_eq!(
            parse(&["preview", "--step", "15"]),
            CliAction::Preview {
                debug_enabled: false,
                config_dir: None,
                date: None,
                step_minutes: 15,
            }
        );
        assert_eq!(
            parse(&["preview"]),
            CliAction::Preview {
                debug_enabled: false,
                config_dir: None,
                date: None,
                step_minutes: DEFAULT_PREVIEW_STEP_MINUTES,
            }
        );
    }

    #[test]
    fn test_help_and_version_take_precedence() {
        assert_eq!(parse(&["run", "--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_invalid_command_lines() {
        assert_eq!(parse(&["--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["sunset"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["run", "extra"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["preview", "--step", "0"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["sun", "--dry-run"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["devices", "--at", "07:00"]), CliAction::ShowHelpDueToError);
    }
}
