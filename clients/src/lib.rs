//! Plumbing shared by the client binaries: logging setup and TOML
//! configuration files.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, raised to
/// `info`, `debug`, and `trace` by one, two, or three `-v` flags.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second initialization in the same process is not an error worth
    // reporting.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Reads a TOML file into `T`, or returns `T::default()` without a path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match `T`.
pub fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prime_calculus::{EngineConfig, OperatorKind};
    use prime_calculus_conformance::SuiteConfig;

    #[test]
    fn missing_path_gives_defaults() {
        let config: EngineConfig = load_config(None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn engine_config_from_toml() {
        let config: EngineConfig =
            toml::from_str("operator = \"next-prime\"\nmax_steps = 12\n").unwrap();
        assert_eq!(config.operator, OperatorKind::NextPrime);
        assert_eq!(config.max_steps, 12);
        assert_eq!(config.eval_max_steps, EngineConfig::default().eval_max_steps);
    }

    #[test]
    fn suite_config_from_toml() {
        let config: SuiteConfig =
            toml::from_str("operators = [\"identity\"]\n\n[engine]\nmax_steps = 50\n").unwrap();
        assert_eq!(config.operators, vec![OperatorKind::Identity]);
        assert_eq!(config.engine.max_steps, 50);
    }

    #[test]
    fn modulus_below_two_is_rejected() {
        let config: EngineConfig = toml::from_str("modulus = 101\n").unwrap();
        assert_eq!(config.modulus.get(), 101);
        let err = toml::from_str::<EngineConfig>("modulus = 1\n").unwrap_err();
        assert!(err.to_string().contains("at least 2"));
        assert!(toml::from_str::<EngineConfig>("modulus = 0\n").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<EngineConfig>("operatr = \"identity\"").is_err());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_config::<EngineConfig>(Some(Path::new("/nonexistent/calculus.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/calculus.toml"));
    }
}
