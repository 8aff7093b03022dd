//! Environment-variable configuration for the mutator. Parsed once at init;
//! invalid numeric values are fatal at startup.

use std::path::PathBuf;

use gurthang_util::fatality;

pub const ENV_LOG: &str = "GURTHANG_MUT_LOG";
pub const ENV_DEBUG: &str = "GURTHANG_MUT_DEBUG";
pub const ENV_FUZZ_MIN: &str = "GURTHANG_MUT_FUZZ_MIN";
pub const ENV_FUZZ_MAX: &str = "GURTHANG_MUT_FUZZ_MAX";
pub const ENV_TRIM_MAX: &str = "GURTHANG_MUT_TRIM_MAX";
pub const ENV_DICT: &str = "GURTHANG_MUT_DICT";

/// Default bounds for the per-input fuzz budget.
pub const FUZZ_MIN_DEFAULT: u32 = 512;
pub const FUZZ_MAX_DEFAULT: u32 = 32768;

/// Default cap on trim steps per trimming stage.
pub const TRIM_STEPS_MAX_DEFAULT: i64 = 2500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutConfig {
    pub fuzz_min: u32,
    pub fuzz_max: u32,
    /// Maximum trim steps; negative means uncapped.
    pub trim_steps_max: i64,
    pub debug: bool,
    pub dict_paths: Vec<PathBuf>,
}

impl Default for MutConfig {
    fn default() -> Self {
        MutConfig {
            fuzz_min: FUZZ_MIN_DEFAULT,
            fuzz_max: FUZZ_MAX_DEFAULT,
            trim_steps_max: TRIM_STEPS_MAX_DEFAULT,
            debug: false,
            dict_paths: Vec::new(),
        }
    }
}

impl MutConfig {
    pub fn from_env() -> MutConfig {
        let mut cfg = MutConfig::default();

        cfg.debug = std::env::var(ENV_DEBUG).is_ok();
        if cfg.debug && std::env::var(ENV_LOG).is_err() {
            fatality!("please enable logging via {ENV_LOG} before toggling {ENV_DEBUG}");
        }

        for (name, field) in [
            (ENV_FUZZ_MIN, &mut cfg.fuzz_min),
            (ENV_FUZZ_MAX, &mut cfg.fuzz_max),
        ] {
            if let Ok(value) = std::env::var(name) {
                tracing::info!("found {name}={value}");
                match parse_positive_u32(&value) {
                    Some(parsed) => *field = parsed,
                    None => fatality!("{name} must be a positive integer"),
                }
            }
        }

        if let Ok(value) = std::env::var(ENV_TRIM_MAX) {
            tracing::info!("found {ENV_TRIM_MAX}={value}");
            match value.trim().parse::<i64>() {
                Ok(parsed) => cfg.trim_steps_max = if parsed < 0 { -1 } else { parsed },
                Err(_) => fatality!("{ENV_TRIM_MAX} must be an integer"),
            }
        }

        if let Ok(value) = std::env::var(ENV_DICT) {
            cfg.dict_paths = split_dict_paths(&value);
        }

        cfg
    }
}

/// Positive-integer parser for the fuzz budget bounds.
pub fn parse_positive_u32(value: &str) -> Option<u32> {
    let parsed: i64 = value.trim().parse().ok()?;
    if parsed <= 0 || parsed > u32::MAX as i64 {
        return None;
    }
    Some(parsed as u32)
}

/// Splits a comma-separated dictionary path list, skipping empty segments.
pub fn split_dict_paths(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
