//! Simulator configuration.
//!
//! [`SimulationConfig`] is the immutable parameter set the production loop
//! runs with. [`AppConfig`] wraps it with the binary's extra settings and
//! loads everything from environment variables.
//!
//! # Environment Variables
//!
//! - `STREAM_SIM_KEYWORDS`: Comma-separated keywords (required)
//! - `STREAM_SIM_MIN_LENGTH`: Minimum tokens per record (default: `5`)
//! - `STREAM_SIM_MAX_LENGTH`: Maximum tokens per record (default: `15`)
//! - `STREAM_SIM_SLEEP_MS`: Delay between records in milliseconds (default: `10000`)
//! - `STREAM_SIM_ON_MALFORMED`: `stop` or `skip` (default: `stop`)
//! - `STREAM_SIM_SEED`: Random seed for reproducible streams (optional)
//! - `STREAM_SIM_WELCOME_MESSAGE`: Logged once at startup (optional)
//!
//! # Invariants
//!
//! A config that passed [`SimulationConfig::validate`] has at least one
//! keyword, no blank or multi-token keywords, and
//! `1 <= min_length <= max_length`.

use crate::stream::MalformedPolicy;

/// Parameters controlling keyword selection, content length and pace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Keywords planted into every record. One is chosen per record.
    pub keywords: Vec<String>,
    /// Minimum number of tokens in a record's text.
    pub min_length: usize,
    /// Maximum number of tokens in a record's text.
    pub max_length: usize,
    /// Delay between records. Zero means no throttling.
    pub interval_ms: u64,
}

/// Error returned when loading or validating configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// A setting has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn invalid(name: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: message.into(),
    }
}

impl SimulationConfig {
    /// Check the config invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `keywords` is empty, or a keyword is blank or contains whitespace
    /// - `min_length` is zero
    /// - `max_length` is less than `min_length`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.is_empty() {
            return Err(invalid("keywords", "at least one keyword is required"));
        }
        for keyword in &self.keywords {
            if keyword.is_empty() {
                return Err(invalid("keywords", "keywords must not be blank"));
            }
            if keyword.chars().any(char::is_whitespace) {
                return Err(invalid(
                    "keywords",
                    format!("keyword {keyword:?} must be a single word"),
                ));
            }
        }
        if self.min_length < 1 {
            return Err(invalid("min_length", "must be at least 1"));
        }
        if self.max_length < self.min_length {
            return Err(invalid(
                "max_length",
                format!(
                    "{} is less than min_length {}",
                    self.max_length, self.min_length
                ),
            ));
        }
        Ok(())
    }
}

/// Full configuration of the simulator binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub malformed_policy: MalformedPolicy,
    pub seed: Option<u64>,
    pub welcome_message: Option<String>,
}

impl AppConfig {
    pub const DEFAULT_MIN_LENGTH: usize = 5;
    pub const DEFAULT_MAX_LENGTH: usize = 15;
    pub const DEFAULT_SLEEP_MS: u64 = 10_000;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `STREAM_SIM_KEYWORDS` is missing, a variable
    /// cannot be parsed, or the resulting [`SimulationConfig`] is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keywords = load_keywords(&lookup)?;
        let min_length = parse_or(&lookup, "STREAM_SIM_MIN_LENGTH", Self::DEFAULT_MIN_LENGTH)?;
        let max_length = parse_or(&lookup, "STREAM_SIM_MAX_LENGTH", Self::DEFAULT_MAX_LENGTH)?;
        let interval_ms = parse_or(&lookup, "STREAM_SIM_SLEEP_MS", Self::DEFAULT_SLEEP_MS)?;
        let malformed_policy =
            parse_or(&lookup, "STREAM_SIM_ON_MALFORMED", MalformedPolicy::default())?;
        let seed = match lookup("STREAM_SIM_SEED") {
            Some(value) => Some(parse_value("STREAM_SIM_SEED", &value)?),
            None => None,
        };
        let welcome_message = lookup("STREAM_SIM_WELCOME_MESSAGE").filter(|m| !m.is_empty());

        let simulation = SimulationConfig {
            keywords,
            min_length,
            max_length,
            interval_ms,
        };
        simulation.validate()?;

        Ok(Self {
            simulation,
            malformed_policy,
            seed,
            welcome_message,
        })
    }
}

/// Split `STREAM_SIM_KEYWORDS` on commas, trimming and dropping blanks.
fn load_keywords<F>(lookup: &F) -> Result<Vec<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup("STREAM_SIM_KEYWORDS")
        .ok_or_else(|| ConfigError::MissingEnvVar("STREAM_SIM_KEYWORDS".to_string()))?;
    let keywords: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToString::to_string)
        .collect();

    if keywords.is_empty() {
        return Err(invalid("STREAM_SIM_KEYWORDS", "must list at least one keyword"));
    }
    Ok(keywords)
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name).map_or(Ok(default), |value| parse_value(name, &value))
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| invalid(name, format!("'{value}' could not be parsed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> SimulationConfig {
        SimulationConfig {
            keywords: vec!["rust".to_string()],
            min_length: 3,
            max_length: 3,
            interval_ms: 10,
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_validate_accepts_valid() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_keywords() {
        let config = SimulationConfig {
            keywords: vec![],
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { name, .. }) if name == "keywords"
        ));
    }

    #[test]
    fn test_validate_rejects_blank_and_multi_word_keywords() {
        let blank = SimulationConfig {
            keywords: vec!["rust".to_string(), String::new()],
            ..valid()
        };
        assert!(blank.validate().is_err());

        let spaced = SimulationConfig {
            keywords: vec!["rust lang".to_string()],
            ..valid()
        };
        assert!(spaced.validate().is_err());

        let newline = SimulationConfig {
            keywords: vec!["rust\n".to_string()],
            ..valid()
        };
        assert!(newline.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_min_length() {
        let config = SimulationConfig {
            min_length: 0,
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { name, .. }) if name == "min_length"
        ));
    }

    #[test]
    fn test_validate_rejects_max_below_min() {
        let config = SimulationConfig {
            min_length: 5,
            max_length: 4,
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                name: "max_length".to_string(),
                message: "4 is less than min_length 5".to_string(),
            })
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("STREAM_SIM_KEYWORDS", "Java, Kafka,,Elastic ")]))
            .expect("config should load");

        assert_eq!(config.simulation.keywords, vec!["Java", "Kafka", "Elastic"]);
        assert_eq!(config.simulation.min_length, AppConfig::DEFAULT_MIN_LENGTH);
        assert_eq!(config.simulation.max_length, AppConfig::DEFAULT_MAX_LENGTH);
        assert_eq!(config.simulation.interval_ms, AppConfig::DEFAULT_SLEEP_MS);
        assert_eq!(config.malformed_policy, MalformedPolicy::Stop);
        assert_eq!(config.seed, None);
        assert_eq!(config.welcome_message, None);
    }

    #[test]
    fn test_from_lookup_all_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STREAM_SIM_KEYWORDS", "rust"),
            ("STREAM_SIM_MIN_LENGTH", "2"),
            ("STREAM_SIM_MAX_LENGTH", "4"),
            ("STREAM_SIM_SLEEP_MS", "0"),
            ("STREAM_SIM_ON_MALFORMED", "skip"),
            ("STREAM_SIM_SEED", "99"),
            ("STREAM_SIM_WELCOME_MESSAGE", "hello"),
        ]))
        .expect("config should load");

        assert_eq!(
            config.simulation,
            SimulationConfig {
                keywords: vec!["rust".to_string()],
                min_length: 2,
                max_length: 4,
                interval_ms: 0,
            }
        );
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.welcome_message.as_deref(), Some("hello"));
    }

    #[test]
    fn test_from_lookup_missing_keywords() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingEnvVar("STREAM_SIM_KEYWORDS".to_string()))
        );
        assert!(AppConfig::from_lookup(lookup(&[("STREAM_SIM_KEYWORDS", " , ")])).is_err());
    }

    #[test]
    fn test_from_lookup_rejects_negative_sleep() {
        let result = AppConfig::from_lookup(lookup(&[
            ("STREAM_SIM_KEYWORDS", "rust"),
            ("STREAM_SIM_SLEEP_MS", "-5"),
        ]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidValue {
                name: "STREAM_SIM_SLEEP_MS".to_string(),
                message: "'-5' could not be parsed".to_string(),
            })
        );
    }

    #[test]
    fn test_from_lookup_rejects_inverted_lengths() {
        let result = AppConfig::from_lookup(lookup(&[
            ("STREAM_SIM_KEYWORDS", "rust"),
            ("STREAM_SIM_MIN_LENGTH", "10"),
            ("STREAM_SIM_MAX_LENGTH", "3"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "max_length"
        ));
    }

    #[test]
    fn test_from_lookup_rejects_unknown_policy() {
        let result = AppConfig::from_lookup(lookup(&[
            ("STREAM_SIM_KEYWORDS", "rust"),
            ("STREAM_SIM_ON_MALFORMED", "retry"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "STREAM_SIM_ON_MALFORMED"
        ));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::MissingEnvVar("TEST_VAR".to_string());
        assert_eq!(
            error.to_string(),
            "missing required environment variable: TEST_VAR"
        );

        let error = ConfigError::InvalidValue {
            name: "TEST_VAR".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for TEST_VAR: bad value");
    }
}
