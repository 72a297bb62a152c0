//! Observability: tracing setup and per-thread synthesis context.
//!
//! ## Usage
//!
//! ```ignore
//! use testsynth::observability::{init_tracing, set_stage, SynthesisStage};
//!
//! init_tracing(1);
//! let _stage = set_stage(SynthesisStage::Analysis);
//! ```

pub mod context;

pub use context::{
    get_current_context, reset_context, set_current_symbol, set_current_unit, set_stage,
    BatchProgress, ContextGuard, SynthesisContext, SynthesisStage,
};

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity-derived filter.
pub const LOG_ENV_VAR: &str = "TESTSYNTH_LOG";

/// Filter directive for a verbosity level (0 = warnings only).
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a global fmt subscriber writing to stderr.
///
/// `TESTSYNTH_LOG` takes precedence over `verbosity`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert_eq!(default_filter(2), "debug");
        assert_eq!(default_filter(7), "trace");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(0);
        init_tracing(2);
    }
}
