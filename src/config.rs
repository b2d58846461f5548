use clap::{parser::ValueSource, ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{SlsError, SlsResult};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub moves: MoveFamilies,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Wall-clock budget for one optimize call, in seconds.
    #[arg(long, default_value_t = 20.0)]
    pub time_limit_secs: f64,
    #[arg(long, default_value_t = 100)]
    pub max_restarts: usize,
    #[arg(long)]
    pub seed: Option<u64>,
    /// How minimize turns the objective into one to maximize.
    #[arg(long, value_enum, default_value_t = MinimizeEncoding::Negate)]
    pub minimize_encoding: MinimizeEncoding,

    // Feasibility walk
    #[arg(long, default_value_t = 10_000)]
    pub walk_steps: usize,
    #[arg(long, default_value_t = 0.1)]
    pub walk_noise: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            time_limit_secs: 20.0,
            max_restarts: 100,
            seed: None,
            minimize_encoding: MinimizeEncoding::Negate,
            walk_steps: 10_000,
            walk_noise: 0.1,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimizeEncoding {
    /// Maximize the two's-complement negation `-f`. Zero maps to zero, so
    /// `f = 0` scores lowest and `f = 1` scores highest.
    Negate,
    /// Maximize the bitwise complement `!f`, which reverses the order exactly.
    Complement,
}

/// Optional move families. Bit flips and bitwise inversion are always tried.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveFamilies {
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_increment_decrement: bool,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_unary_minus: bool,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_mul2_div2: bool,
    /// Only takes effect together with `enable_mul2_div2`.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_mul3: bool,
}

impl Default for MoveFamilies {
    fn default() -> Self {
        Self {
            enable_increment_decrement: true,
            enable_unary_minus: true,
            enable_mul2_div2: true,
            enable_mul3: true,
        }
    }
}

impl MoveFamilies {
    /// Flips and inversion only.
    pub fn minimal() -> Self {
        Self {
            enable_increment_decrement: false,
            enable_unary_minus: false,
            enable_mul2_div2: false,
            enable_mul3: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SlsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlsError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SlsResult<()> {
        let s = &self.search;
        if Duration::try_from_secs_f64(s.time_limit_secs).is_err() {
            return Err(SlsError::Config(format!(
                "time_limit_secs must be a non-negative number of seconds a timer can hold, got {}",
                s.time_limit_secs
            )));
        }
        if !(0.0..=1.0).contains(&s.walk_noise) {
            return Err(SlsError::Config(format!(
                "walk_noise must lie in [0, 1], got {}",
                s.walk_noise
            )));
        }
        Ok(())
    }

    /// Copies every flag given explicitly on the command line over `self`.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.time_limit_secs);
        update_if_present!(search.max_restarts);
        update_if_present!(search.seed);
        update_if_present!(search.minimize_encoding);
        update_if_present!(search.walk_steps);
        update_if_present!(search.walk_noise);

        update_if_present!(moves.enable_increment_decrement);
        update_if_present!(moves.enable_unary_minus);
        update_if_present!(moves.enable_mul2_div2);
        update_if_present!(moves.enable_mul3);
    }
}
