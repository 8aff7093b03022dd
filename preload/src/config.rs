//! Environment-variable configuration for the preload library. Everything is
//! read once, at init; invalid numeric values are fatal at startup.

use gurthang_util::fatality;

pub const ENV_LOG: &str = "GURTHANG_LIB_LOG";
pub const ENV_SEND_BUFFSIZE: &str = "GURTHANG_LIB_SEND_BUFFSIZE";
pub const ENV_RECV_BUFFSIZE: &str = "GURTHANG_LIB_RECV_BUFFSIZE";
pub const ENV_NO_WAIT: &str = "GURTHANG_LIB_NO_WAIT";
pub const ENV_EXIT_IMMEDIATE: &str = "GURTHANG_LIB_EXIT_IMMEDIATE";

/// Default per-call send/recv piece size.
pub const BUFFSIZE_DEFAULT: usize = 2048;

/// Hard cap on the configurable send/recv piece size.
pub const BUFFSIZE_MAX: usize = 1 << 19;

/// How the controller drives chunk workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Spawn a worker, wait for it, spawn the next. Deterministic across
    /// runs of the same input, which is what makes fuzzer findings
    /// reproducible. The default.
    Serial,
    /// Spawn every worker up front, then wait for all of them. Faster and
    /// explicitly nondeterministic.
    Parallel,
}

#[derive(Debug, Clone)]
pub struct LibConfig {
    pub send_buffsize: usize,
    pub recv_buffsize: usize,
    pub dispatch: Dispatch,
    pub exit_immediate: bool,
}

impl Default for LibConfig {
    fn default() -> Self {
        LibConfig {
            send_buffsize: BUFFSIZE_DEFAULT,
            recv_buffsize: BUFFSIZE_DEFAULT,
            dispatch: Dispatch::Serial,
            exit_immediate: false,
        }
    }
}

impl LibConfig {
    pub fn from_env() -> LibConfig {
        let mut cfg = LibConfig::default();
        for (name, field) in [
            (ENV_SEND_BUFFSIZE, &mut cfg.send_buffsize),
            (ENV_RECV_BUFFSIZE, &mut cfg.recv_buffsize),
        ] {
            if let Ok(value) = std::env::var(name) {
                tracing::info!("found {name}={value}");
                match parse_buffsize(&value) {
                    Some(size) => {
                        if value.trim().parse::<u64>().is_ok_and(|raw| raw > size as u64) {
                            tracing::info!("exceeded maximum value, capped at {size}");
                        }
                        *field = size;
                    }
                    None => fatality!("{name} must be set to a positive integer"),
                }
            }
        }
        if std::env::var(ENV_NO_WAIT).is_ok() {
            tracing::info!("found {ENV_NO_WAIT}, enabling parallel dispatch");
            cfg.dispatch = Dispatch::Parallel;
        }
        if std::env::var(ENV_EXIT_IMMEDIATE).is_ok() {
            tracing::info!("found {ENV_EXIT_IMMEDIATE}, exit handlers will be bypassed");
            cfg.exit_immediate = true;
        }
        cfg
    }
}

/// Parses a send/recv piece size: must be a positive integer, capped at
/// [`BUFFSIZE_MAX`]. Returns `None` when the value is not usable.
pub fn parse_buffsize(value: &str) -> Option<usize> {
    let parsed: i64 = value.trim().parse().ok()?;
    if parsed <= 0 {
        return None;
    }
    Some((parsed as usize).min(BUFFSIZE_MAX))
}
