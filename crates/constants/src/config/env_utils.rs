use crate::ConfigError;
use std::{borrow::Cow, env};

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load a variable from the environment
pub fn load_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Load a variable from the environment
pub fn load_u32_opt(key: &str) -> Option<u32> {
    load_string_opt(key)?.trim().parse().ok()
}

/// Load a variable from the environment
pub fn load_bool_opt(key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(val) = load_string_opt(key) else { return Ok(None) };
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(Some(true)),
        "0" | "false" | "no" => Ok(Some(false)),
        _ => Err(ConfigError::ParseBool(key.to_string())),
    }
}

/// Load a variable from the environment
pub fn load_url(key: &str) -> Result<Cow<'static, str>, ConfigError> {
    load_string(key).map(Into::into)
}

/// Load a comma-separated list of chain ids from the environment
pub fn load_chain_ids_opt(key: &str) -> Result<Option<Vec<u64>>, ConfigError> {
    let Some(val) = load_string_opt(key) else { return Ok(None) };
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().map_err(Into::into))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
