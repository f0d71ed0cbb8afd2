use std::path::Path;

use crate::{Config, error::Error};

pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    log::debug!("Loading configuration from {}", path.display());

    parse(&content)
}

pub(crate) fn parse(content: &str) -> crate::Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_stream(&config)?;

    Ok(config)
}

fn validate_stream(config: &Config) -> crate::Result<()> {
    let stream = &config.stream;

    if stream.pool_capacity == 0 {
        return Err(Error::Validation {
            field: "stream.pool_capacity",
            reason: "must be greater than zero".to_string(),
        });
    }

    if stream.prewarm > stream.pool_capacity {
        return Err(Error::Validation {
            field: "stream.prewarm",
            reason: format!(
                "{} exceeds the pool capacity of {}",
                stream.prewarm, stream.pool_capacity
            ),
        });
    }

    Ok(())
}
