//! Help and version output.

/// Display version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("lampor [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("run (default)          Apply the current target to every lamp once");
    log_indented!("    --at <time>        Pretend it is \"HH:MM\" or \"YYYY-MM-DD HH:MM\"");
    log_indented!("    --dry-run          Read the lamps but write nothing");
    log_indented!("    --log <file>       Append output to a file instead of stdout");
    log_indented!("sun [YYYY-MM-DD]       Show sunrise, sunset and phase boundaries");
    log_indented!("preview [YYYY-MM-DD]   Show targets across a day without touching lamps");
    log_indented!("    --step <minutes>   Time between rows (default 30)");
    log_indented!("devices                List lamps and their current state");
    log_block_start!("Scheduling:");
    log_indented!("lampor runs one pass and exits. Call it every minute from a");
    log_indented!("systemd timer or cron, e.g.: * * * * * lampor --log ~/lampor.log");
    log_end!();
}
