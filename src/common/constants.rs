//! Application constants and default values for lampor.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

// ═══ Schedule Defaults ═══
// Used when the [Schedule] section leaves a value unspecified

pub const DEFAULT_MIN_COLOR_TEMP: u32 = 2000; // Kelvin - warmest white
pub const DEFAULT_MAX_COLOR_TEMP: u32 = 5500; // Kelvin - coolest white
pub const DEFAULT_COLOR_RAMP_MINUTES: u32 = 30;
pub const DEFAULT_MIN_BRIGHTNESS: u32 = 1;
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;
pub const DEFAULT_BRIGHTNESS_RAMP_MINUTES: u32 = 30;
pub const DEFAULT_MORNING_START: &str = "07:00"; // end of the forced pre-dawn ramp
pub const DEFAULT_MORNING_RAMP_MINUTES: u32 = 30;
pub const DEFAULT_NIGHT_START: &str = "01:00"; // red light from here on
pub const DEFAULT_NIGHT_RGB: [u8; 3] = [255, 0, 0];
pub const DEFAULT_DAY_COLOR_STRATEGY: &str = "set";

// ═══ Location Defaults ═══

pub const DEFAULT_TWILIGHT: &str = "civil";

// ═══ Gateway Defaults ═══

pub const DEFAULT_GATEWAY: &str = "socket";
pub const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 5000;
pub const GATEWAY_SOCKET_NAME: &str = "gateway.sock"; // under $XDG_RUNTIME_DIR/lampor/

// ═══ Validation Limits ═══

// Temperature limits (Kelvin scale)
pub const MINIMUM_TEMP: u32 = 1000;
pub const MAXIMUM_TEMP: u32 = 10000;

// Brightness limits (device dimmer scale)
pub const MINIMUM_BRIGHTNESS: u32 = 1;
pub const MAXIMUM_BRIGHTNESS: u32 = 255;

// Ramp duration limits
pub const MINIMUM_RAMP_MINUTES: u32 = 1;
pub const MAXIMUM_RAMP_MINUTES: u32 = 180;

// Gateway timeout limits
pub const MINIMUM_GATEWAY_TIMEOUT_MS: u64 = 100;
pub const MAXIMUM_GATEWAY_TIMEOUT_MS: u64 = 60_000;

// ═══ Time Constants ═══

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ═══ Preview Command ═══

pub const DEFAULT_PREVIEW_STEP_MINUTES: u32 = 30;

// ═══ Exit Codes ═══

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

// ═══ Test Constants ═══

#[cfg(test)]
pub mod test_constants {
    /// Stockholm, a location with a comfortably wide daylight window in spring.
    pub const TEST_LATITUDE: f64 = 59.3293;
    pub const TEST_LONGITUDE: f64 = 18.0686;
    pub const TEST_TIMEZONE: &str = "Europe/Stockholm";

    pub const TEST_SUNRISE: u32 = 390; // 06:30
    pub const TEST_SUNSET: u32 = 1230; // 20:30
}
