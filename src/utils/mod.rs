//! Utility modules for the collectors

pub mod process;

/// Logging utilities
pub struct Logger;

impl Logger {
    /// Map `-v` repetitions to a level: warn, info, debug
    pub fn level_for(verbosity: u8) -> log::LevelFilter {
        match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }

    /// Initialize logger with specified level; `RUST_LOG` still wins
    pub fn init(level: log::LevelFilter) {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp_secs()
            .init();
    }
}
