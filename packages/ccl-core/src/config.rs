use ccl_macros::config;

use crate::logger::LogLevel;

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

config! {
    pub struct LoggerConfig {
        enabled: bool = true,
        log_level: LogLevel = LogLevel::Info,
        log_file: bool = false,
    }
}

/// Top-level configuration for one engine run: how many ranks to simulate
/// and how the run is logged. Mirrors the layered defaults/TOML-override
/// pattern used for every other config struct in the workspace.
config! {
    pub struct EngineConfig {
        process_count: usize = 1,
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let config = EngineConfig::default();
        assert_eq!(*config.get_process_count(), 1);
        assert!(*config.get_logger().get_enabled());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = EngineConfig::default().with_process_count(8);
        assert_eq!(*config.get_process_count(), 8);
    }
}
