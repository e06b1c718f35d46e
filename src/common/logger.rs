//! Structured logging with visual formatting.
//!
//! Every tick writes a short, human-readable report: one block for the
//! decision (phase, sun window, targets) and one line per device action or
//! failure. Output goes to stdout, or to a file through a background writer
//! when `--log` is given, which is how lampor is usually run from a timer.
//!
//! ## Logging Conventions
//!
//! - **`log_block_start!`**: opens a new conceptual block (`┃` spacer then `┣ message`).
//! - **`log_decorated!`**: a line inside the current block (`┣ message`).
//! - **`log_indented!`**: nested detail under the previous line (`┃   message`).
//! - **`log_pipe!`**: a bare `┃` spacer, used before a semantic message that starts
//!   a new visual group. Never at the end of a block.
//! - **`log_version!`** / **`log_end!`**: header and terminator, once per process.
//! - **`log_info!`**, **`log_warning!`**, **`log_error!`**, **`log_debug!`**,
//!   **`log_critical!`**: `[LEVEL]`-prefixed semantic messages.
//! - **`log_error_exit!`**: closes the output with an error corner before a non-zero exit.
//!
//! When the clock is pinned with `--at`, every line is prefixed with the
//! pinned `[HH:MM]` so a saved log reads like the real run would have.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Present only while --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Main logging interface.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    ///
    /// Tests switch logging off so assertion output stays readable.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Route all further output into `file_path`.
    ///
    /// The returned guard flushes and joins the writer thread when dropped,
    /// so it must live until the end of `main`.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix for pinned-clock runs, empty otherwise.
    ///
    /// Public for macro access.
    pub fn get_timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M"))
        } else {
            String::new()
        }
    }
}

/// Guard for file logging that ensures a clean shutdown of the writer thread.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Remove `ESC [ ... m` colour sequences so log files stay plain text.
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Shared body of every logging macro: `$layout` receives the timestamp
/// prefix and the rendered message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($layout:literal, $($arg:tt)+) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($($arg)+);
            let formatted = format!($layout, prefix = prefix, message = message);
            $crate::common::logger::write_output(&formatted);
        }
    }};
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣ {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣ {message}\n", "{}", $expr)
    };
}

/// Log an indented message for details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┃   {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┃   {message}\n", "{}", $expr)
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!("{prefix}┃{message}\n", "")
    };
}

/// Log a block start message, initiating a new conceptual block.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┃\n{prefix}┣ {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┃\n{prefix}┣ {message}\n", "{}", $expr)
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            "{prefix}┏ lampor v{message} ━━╸\n",
            "{}",
            env!("CARGO_PKG_VERSION")
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!("{prefix}╹{message}\n", "")
    };
}

/// Log a warning message with yellow `[WARNING]` tag.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[33mWARNING\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[33mWARNING\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log an error message with red `[ERROR]` tag.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[31mERROR\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[31mERROR\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log an error that terminates the run, closing the output with a corner.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            "{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n",
            $fmt $($arg)*
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            "{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n",
            "{}",
            $expr
        )
    };
}

/// Log an informational message with green `[INFO]` tag.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mINFO\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mINFO\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log a debug message with green `[DEBUG]` tag.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mDEBUG\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mDEBUG\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log a critical message with red `[CRITICAL]` tag.
#[macro_export]
macro_rules! log_critical {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[31mCRITICAL\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[31mCRITICAL\x1b[0m] {message}\n", "{}", $expr)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_macro_is_silent_when_disabled() {
        Log::set_enabled(false);
        log_block_start!("Sun on {}", "2024-03-20");
        log_decorated!("Sunrise: {}", "06:05");
        log_indented!("Target: {}%", 43);
        log_info!("{} lamp(s), {} write(s)", 2, 4);
        log_warning!("No lamps with light control were found");
        log_error!("Hallway: {} failed", "write brightness");
        log_critical!("All {} lamp(s) failed", 2);
        log_debug!(String::from("Using Memory gateway"));
        assert!(!Log::is_enabled());
    }

    #[test]
    fn test_strip_ansi_codes_removes_colour_sequences() {
        let coloured = "┣[\x1b[31mERROR\x1b[0m] Kitchen: timeout";
        assert_eq!(strip_ansi_codes(coloured), "┣[ERROR] Kitchen: timeout");
    }

    #[test]
    fn test_strip_ansi_codes_keeps_lone_escape() {
        assert_eq!(strip_ansi_codes("a\x1bb"), "a\x1bb");
    }

    #[test]
    fn test_strip_ansi_codes_plain_text_untouched() {
        let plain = "┃   Hallway 43% hint";
        assert_eq!(strip_ansi_codes(plain), plain);
    }
}
