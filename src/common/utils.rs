//! Small helpers shared by the commands and the config loader.

use std::path::Path;

/// Replace the home directory prefix of `path` with `~` for log output.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}

/// Render a 0-255 dimmer level as a percentage bar for the preview table.
pub fn brightness_bar(level: f64, width: usize) -> String {
    let filled = ((level / 255.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "·".repeat(width - filled))
}
