//! Fatal-error termination.
//!
//! Unrecoverable errors anywhere in the harness end the process with a fixed
//! sentinel exit code so the host fuzzer can tell a harness failure apart
//! from a target crash.

use std::sync::atomic::{AtomicBool, Ordering};

/// Exit code used for every fatal internal error.
pub const FATAL_EXIT_CODE: i32 = 24060;

static EXIT_IMMEDIATE: AtomicBool = AtomicBool::new(false);

/// When set, [`exit_process`] uses `_exit()` instead of `exit()`, bypassing
/// registered exit handlers. Targets that install exit handlers expected to
/// run only on their own threads will otherwise deadlock or crash during
/// teardown.
pub fn set_exit_immediate(immediate: bool) {
    EXIT_IMMEDIATE.store(immediate, Ordering::SeqCst);
}

/// Terminates the process with the given code, honoring the immediate-exit
/// toggle.
pub fn exit_process(code: i32) -> ! {
    if EXIT_IMMEDIATE.load(Ordering::SeqCst) {
        unsafe { libc::_exit(code) }
    }
    std::process::exit(code)
}

#[doc(hidden)]
pub fn fatal_exit() -> ! {
    exit_process(FATAL_EXIT_CODE)
}

/// Logs a diagnostic line, mirrors it to stderr, and terminates the process
/// with [`FATAL_EXIT_CODE`].
#[macro_export]
macro_rules! fatality {
    ($($arg:tt)*) => {{
        tracing::error!($($arg)*);
        eprintln!("gurthang: fatal: {}", format_args!($($arg)*));
        $crate::fatal::fatal_exit()
    }};
}
