//! Runtime configuration, read from `STEPWISE_*` environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::timer::{Pacing, Speed};

/// Configuration for a visualizer server.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Tick pacing (delay = base - speed * per_unit)
    pub pacing: Pacing,

    /// Speed both visualizers start at
    pub speed: Speed,

    /// Size of the initial random array
    pub array_size: usize,

    /// Initial grid dimensions
    pub grid_rows: usize,
    pub grid_cols: usize,

    /// Fixed RNG seed for reproducible arrays and walls
    pub seed: Option<u64>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            pacing: Pacing::default(),
            speed: Speed::default(),
            array_size: 20,
            grid_rows: stepwise_grid::Grid::DEFAULT_ROWS,
            grid_cols: stepwise_grid::Grid::DEFAULT_COLS,
            seed: None,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_ms = parse_or(get("STEPWISE_BASE_DELAY_MS"), "STEPWISE_BASE_DELAY_MS", 1000u64)?;
        let per_speed_ms = parse_or(
            get("STEPWISE_DELAY_PER_SPEED_MS"),
            "STEPWISE_DELAY_PER_SPEED_MS",
            9u64,
        )?;
        let speed: u32 = parse_or(get("STEPWISE_SPEED"), "STEPWISE_SPEED", 50)?;

        let seed = get("STEPWISE_SEED")
            .map(|raw| parse("STEPWISE_SEED", &raw))
            .transpose()?;

        Ok(Self {
            api_addr: parse_or(get("STEPWISE_API_ADDR"), "STEPWISE_API_ADDR", defaults.api_addr)?,
            pacing: Pacing::new(
                Duration::from_millis(base_ms),
                Duration::from_millis(per_speed_ms),
            ),
            speed: Speed::new(speed),
            array_size: parse_or(get("STEPWISE_ARRAY_SIZE"), "STEPWISE_ARRAY_SIZE", defaults.array_size)?,
            grid_rows: parse_or(get("STEPWISE_GRID_ROWS"), "STEPWISE_GRID_ROWS", defaults.grid_rows)?,
            grid_cols: parse_or(get("STEPWISE_GRID_COLS"), "STEPWISE_GRID_COLS", defaults.grid_cols)?,
            seed,
        })
    }

    /// A fresh RNG: seeded when `seed` is set, from OS entropy otherwise.
    ///
    /// `stream` separates the sequences handed to different owners that
    /// share one seed.
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid {key}: {raw:?}")))
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = VisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, VisConfig::default());
        assert_eq!(config.pacing.delay(config.speed), Duration::from_millis(550));
    }

    #[test]
    fn overrides_are_applied() {
        let config = VisConfig::from_lookup(lookup(&[
            ("STEPWISE_API_ADDR", "127.0.0.1:8088"),
            ("STEPWISE_SPEED", "250"),
            ("STEPWISE_BASE_DELAY_MS", "200"),
            ("STEPWISE_SEED", " 42 "),
            ("STEPWISE_GRID_ROWS", ""),
        ]))
        .unwrap();
        assert_eq!(config.api_addr.port(), 8088);
        assert_eq!(config.speed, Speed::MAX);
        assert_eq!(config.pacing.base, Duration::from_millis(200));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.grid_rows, 15);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = VisConfig::from_lookup(lookup(&[("STEPWISE_ARRAY_SIZE", "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("STEPWISE_ARRAY_SIZE")));
    }

    #[test]
    fn seeded_rngs_are_reproducible() {
        use rand::Rng;
        let config = VisConfig {
            seed: Some(3),
            ..VisConfig::default()
        };
        let a: u64 = config.rng(1).gen();
        let b: u64 = config.rng(1).gen();
        assert_eq!(a, b);
    }
}
