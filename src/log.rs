//! Logger setup shared by the CLI, the helper binaries and the browser build.

#[cfg(not(target_arch = "wasm32"))]
use log::LevelFilter;

/// Environment variable that turns on debug logging for the native binaries.
pub const DEBUG_ENV_VAR: &str = "ACROSTIC_DEBUG";

/// True when [`DEBUG_ENV_VAR`] is set (to anything).
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn debug_requested() -> bool {
    std::env::var_os(DEBUG_ENV_VAR).is_some()
}

/// Initialize logging at Info, or Debug if `debug_enabled`.
///
/// - **Native:** `env_logger` without timestamps or module paths; `RUST_LOG`
///   overrides the level when set.
/// - **WASM:** `console_log` at the same level.
///
/// Calling it twice is harmless: the second logger is ignored.
pub fn init_logger(debug_enabled: bool) {
    #[cfg(target_arch = "wasm32")]
    {
        let level = if debug_enabled { log::Level::Debug } else { log::Level::Info };

        match console_log::init_with_level(level) {
            Ok(()) => log::info!("WASM logger initialized at {level:?} level"),
            Err(e) => {
                let msg = format!("Failed to initialize console_log: {e}. Logging will be unavailable.");
                web_sys::console::error_1(&msg.into());
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let level = if debug_enabled { LevelFilter::Debug } else { LevelFilter::Info };

        let mut builder = env_logger::Builder::new();
        builder
            .filter(None, level)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false);

        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }

        if builder.try_init().is_ok() {
            log::debug!("Native logger initialized at {level:?} level");
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false);
        init_logger(true);
        log::info!("still logging");
    }
}
