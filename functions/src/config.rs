use std::env;

use crate::sink::AppendTarget;

pub const DEFAULT_LOG_GROUP_NAME: &str = "CloudConnexa/Logs";
pub const DEFAULT_LOG_STREAM_NAME: &str = "Lambda-Stream";

const ENV_LOG_GROUP_NAME: &str = "LOG_GROUP_NAME";
const ENV_LOG_STREAM_NAME: &str = "LOG_STREAM_NAME";

/// Destination settings taken from the function's environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub log_group_name: String,
    pub log_stream_name: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Empty values fall back to the defaults, same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            log_group_name: value(ENV_LOG_GROUP_NAME, DEFAULT_LOG_GROUP_NAME),
            log_stream_name: value(ENV_LOG_STREAM_NAME, DEFAULT_LOG_STREAM_NAME),
        }
    }

    pub fn target(&self) -> AppendTarget {
        AppendTarget {
            group: self.log_group_name.clone(),
            stream: self.log_stream_name.clone(),
        }
    }
}
