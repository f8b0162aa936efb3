//! Configuration types.

use crate::error::ConfigError;

/// Default number of search results rendered per query.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Default number of history entries fed back to the model on free-form turns.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Assistant name for identification in logs.
    pub name: String,
    /// Result cap for web and video searches.
    pub max_results: usize,
    /// How many trailing history entries the free-form context includes.
    pub history_window: usize,
    /// Port for the WebSocket chat + REST listener.
    pub ws_port: u16,
    /// Whether the WebSocket channel is started.
    pub web_enabled: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "morning-assist".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            history_window: DEFAULT_HISTORY_WINDOW,
            ws_port: 8080,
            web_enabled: true,
        }
    }
}

impl AssistantConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_results = parse_or(&lookup, "MORNING_ASSIST_MAX_RESULTS", defaults.max_results)?;
        if max_results == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MORNING_ASSIST_MAX_RESULTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let history_window = parse_or(
            &lookup,
            "MORNING_ASSIST_HISTORY_WINDOW",
            defaults.history_window,
        )?;
        let ws_port = parse_or(&lookup, "MORNING_ASSIST_WS_PORT", defaults.ws_port)?;
        let web_disabled = parse_flag(&lookup, "MORNING_ASSIST_DISABLE_WEB")?;

        Ok(Self {
            max_results,
            history_window,
            ws_port,
            web_enabled: !web_disabled,
            ..defaults
        })
    }
}

/// Read an environment variable, treating blank values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Boolean switch: unset means false.
fn parse_flag<F>(lookup: &F, key: &str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected true or false, got {raw:?}"),
        }),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AssistantConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.max_results, 3);
        assert_eq!(config.history_window, 5);
        assert_eq!(config.ws_port, 8080);
        assert!(config.web_enabled);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AssistantConfig::from_lookup(lookup_from(&[
            ("MORNING_ASSIST_MAX_RESULTS", "5"),
            ("MORNING_ASSIST_WS_PORT", "9000"),
            ("MORNING_ASSIST_DISABLE_WEB", "1"),
        ]))
        .unwrap();
        assert_eq!(config.max_results, 5);
        assert_eq!(config.ws_port, 9000);
        assert!(!config.web_enabled);
    }

    #[test]
    fn disable_web_is_a_boolean() {
        for off in ["0", "false", "No", "off"] {
            let config =
                AssistantConfig::from_lookup(lookup_from(&[("MORNING_ASSIST_DISABLE_WEB", off)]))
                    .unwrap();
            assert!(config.web_enabled, "{off} should keep the web channel");
        }

        let config =
            AssistantConfig::from_lookup(lookup_from(&[("MORNING_ASSIST_DISABLE_WEB", "TRUE")]))
                .unwrap();
        assert!(!config.web_enabled);

        let err =
            AssistantConfig::from_lookup(lookup_from(&[("MORNING_ASSIST_DISABLE_WEB", "maybe")]))
                .unwrap_err();
        assert!(err.to_string().contains("MORNING_ASSIST_DISABLE_WEB"));
    }

    #[test]
    fn zero_max_results_rejected() {
        let err = AssistantConfig::from_lookup(lookup_from(&[("MORNING_ASSIST_MAX_RESULTS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn garbage_port_rejected() {
        let err = AssistantConfig::from_lookup(lookup_from(&[("MORNING_ASSIST_WS_PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("MORNING_ASSIST_WS_PORT"));
    }
}
