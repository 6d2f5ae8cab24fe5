use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{PowerProfile, UsageProfile};

/// Prefix for environment overrides, e.g. `ENDURANCE_DAILY_USAGE_HOURS=10`.
pub const ENV_PREFIX: &str = "ENDURANCE_";

/// Every recognized config key, in estimator argument order.
pub const KEYS: [&str; 7] = [
    "battery_capacity_ah",
    "active_current_a",
    "light_sleep_current_a",
    "deep_sleep_current_a",
    "daily_usage_hours",
    "light_sleep_coef",
    "deep_sleep_coef",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("expected key=value, got {0:?}")]
    MissingSeparator(String),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Estimator inputs. Defaults are the reference hardware and usage figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnduranceCfg {
    // hardware
    pub battery_capacity_ah: f64,
    pub active_current_a: f64,
    pub light_sleep_current_a: f64,
    pub deep_sleep_current_a: f64,

    // usage
    pub daily_usage_hours: f64,
    pub light_sleep_coef: f64,
    pub deep_sleep_coef: f64,
}

impl Default for EnduranceCfg {
    fn default() -> Self {
        Self {
            battery_capacity_ah: 2.6,
            active_current_a: 0.050,
            light_sleep_current_a: 0.001,
            deep_sleep_current_a: 0.00001,
            daily_usage_hours: 8.0,
            light_sleep_coef: 0.7,
            deep_sleep_coef: 0.5,
        }
    }
}

impl EnduranceCfg {
    /// Build from a key/value map. Missing or unparsable keys keep their default.
    pub fn from_map(m: &HashMap<String, String>) -> Self {
        let d = Self::default();
        Self {
            battery_capacity_ah: get_or(m, "battery_capacity_ah", d.battery_capacity_ah),
            active_current_a: get_or(m, "active_current_a", d.active_current_a),
            light_sleep_current_a: get_or(m, "light_sleep_current_a", d.light_sleep_current_a),
            deep_sleep_current_a: get_or(m, "deep_sleep_current_a", d.deep_sleep_current_a),
            daily_usage_hours: get_or(m, "daily_usage_hours", d.daily_usage_hours),
            light_sleep_coef: get_or(m, "light_sleep_coef", d.light_sleep_coef),
            deep_sleep_coef: get_or(m, "deep_sleep_coef", d.deep_sleep_coef),
        }
    }

    /// Build from `ENDURANCE_*` variables. Pass `std::env::vars()` in production.
    ///
    /// Unknown keys and unparsable values are logged and skipped.
    pub fn from_env_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            if !KEYS.contains(&key.as_str()) {
                tracing::warn!(var = %name, "ignoring unknown endurance variable");
                continue;
            }
            if value.trim().parse::<f64>().is_err() {
                tracing::warn!(var = %name, value = %value, "ignoring unparsable endurance variable");
                continue;
            }
            map.insert(key, value.trim().to_owned());
        }
        Self::from_map(&map)
    }

    /// Apply one `key=value` override. Strict, unlike [`Self::from_map`].
    pub fn apply_override(&mut self, pair: &str) -> Result<(), ConfigError> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::MissingSeparator(pair.to_owned()))?;
        let key = key.trim();
        let parsed: f64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })?;

        let slot = match key {
            "battery_capacity_ah" => &mut self.battery_capacity_ah,
            "active_current_a" => &mut self.active_current_a,
            "light_sleep_current_a" => &mut self.light_sleep_current_a,
            "deep_sleep_current_a" => &mut self.deep_sleep_current_a,
            "daily_usage_hours" => &mut self.daily_usage_hours,
            "light_sleep_coef" => &mut self.light_sleep_coef,
            "deep_sleep_coef" => &mut self.deep_sleep_coef,
            other => return Err(ConfigError::UnknownKey(other.to_owned())),
        };
        *slot = parsed;
        Ok(())
    }

    pub fn hardware(&self) -> PowerProfile {
        PowerProfile {
            capacity_ah: self.battery_capacity_ah,
            active_current_a: self.active_current_a,
            light_sleep_current_a: self.light_sleep_current_a,
            deep_sleep_current_a: self.deep_sleep_current_a,
        }
    }

    pub fn usage(&self) -> UsageProfile {
        UsageProfile {
            daily_usage_hours: self.daily_usage_hours,
            light_sleep_coef: self.light_sleep_coef,
            deep_sleep_coef: self.deep_sleep_coef,
        }
    }

    pub fn to_entries(&self) -> Vec<(&'static str, String, &'static str)> {
        vec![
            ("battery_capacity_ah", self.battery_capacity_ah.to_string(), "Battery capacity (Ah)"),
            ("active_current_a", self.active_current_a.to_string(), "Active current draw (A)"),
            ("light_sleep_current_a", self.light_sleep_current_a.to_string(), "Light-sleep current draw (A)"),
            ("deep_sleep_current_a", self.deep_sleep_current_a.to_string(), "Deep-sleep current draw (A)"),
            ("daily_usage_hours", self.daily_usage_hours.to_string(), "Average daily active time (h)"),
            ("light_sleep_coef", self.light_sleep_coef.to_string(), "Share of active time in light sleep"),
            ("deep_sleep_coef", self.deep_sleep_coef.to_string(), "Share of daily usage in deep sleep"),
        ]
    }
}

fn get_or<T: std::str::FromStr>(map: &HashMap<String, String>, key: &str, default: T) -> T {
    map.get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
