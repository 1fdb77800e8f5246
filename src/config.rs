use std::path::PathBuf;

use crate::validate::DurationPolicy;

/// Process configuration, read once from `COURTSLOT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    /// JSON seed for the registry; the built-in seed when `None`.
    pub seed_file: Option<PathBuf>,
    pub duration_policy: DurationPolicy,
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            seed_file: None,
            duration_policy: DurationPolicy::Minimum,
            metrics_port: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable ports fall back to
    /// their defaults; an unknown duration policy is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();
        let duration_policy = match lookup("COURTSLOT_DURATION_POLICY") {
            Some(s) => s.parse()?,
            None => defaults.duration_policy,
        };
        Ok(Self {
            bind: lookup("COURTSLOT_BIND").unwrap_or(defaults.bind),
            port: lookup("COURTSLOT_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            seed_file: lookup("COURTSLOT_SEED_FILE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            duration_policy,
            metrics_port: lookup("COURTSLOT_METRICS_PORT").and_then(|s| s.parse().ok()),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
