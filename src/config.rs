use crate::feedback::DEFAULT_WINDOW;
use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub tick: Duration,
    pub feedback_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("data"),
            tick: Duration::from_secs(1),
            feedback_window: DEFAULT_WINDOW,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source; unparsable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let data_dir = lookup("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let tick = lookup("TIMER_TICK_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick);
        let feedback_window = lookup("FEEDBACK_WINDOW")
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|window| *window > 0)
            .unwrap_or(defaults.feedback_window);

        Self {
            port,
            data_dir,
            tick,
            feedback_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.tick, Duration::from_secs(1));
        assert_eq!(config.feedback_window, 12);
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("APP_DATA_DIR", "/tmp/coach"),
            ("TIMER_TICK_MS", "25"),
            ("FEEDBACK_WINDOW", "0"),
        ]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/coach"));
        assert_eq!(config.tick, Duration::from_millis(25));
        assert_eq!(config.feedback_window, 12);

        let config = Config::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, 8080);
    }
}
