mod error;
mod loader;

use std::path::Path;

use serde::Deserialize;

pub use error::Error;

pub(crate) type Result<T> = std::result::Result<T, error::Error>;

/// Runtime configuration of the `bifrost` binary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
        loader::load(path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Log filter directive, e.g. `info` or `llm=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Maximum number of idle translation states kept for reuse.
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
    /// Number of states created up front.
    #[serde(default)]
    pub prewarm: usize,
    #[serde(default)]
    pub framing: StreamFraming,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            pool_capacity: default_pool_capacity(),
            prewarm: 0,
            framing: StreamFraming::default(),
        }
    }
}

/// How stream events are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamFraming {
    /// Server-Sent Events: an `event:` line and a `data:` line per event.
    #[default]
    Sse,
    /// One JSON object per line.
    JsonLines,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_pool_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::Config;

    #[test]
    fn all_values() {
        let config = indoc! {r#"
            [log]
            filter = "llm=debug"

            [stream]
            pool_capacity = 16
            prewarm = 4
            framing = "json_lines"
        "#};

        let config = crate::loader::parse(config).unwrap();

        insta::assert_debug_snapshot!(&config, @r#"
        Config {
            log: LogConfig {
                filter: "llm=debug",
            },
            stream: StreamConfig {
                pool_capacity: 16,
                prewarm: 4,
                framing: JsonLines,
            },
        }
        "#);
    }

    #[test]
    fn defaults() {
        let config: Config = toml::from_str("").unwrap();

        insta::assert_debug_snapshot!(&config, @r#"
        Config {
            log: LogConfig {
                filter: "info",
            },
            stream: StreamConfig {
                pool_capacity: 64,
                prewarm: 0,
                framing: Sse,
            },
        }
        "#);
    }
}
