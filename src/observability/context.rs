//! Thread-local context tracking for the synthesis pipeline.
//!
//! Records which stage, unit and symbol the current thread is working on so
//! diagnostics can say where a failure happened. Each rayon worker has its
//! own context; batch progress is shared through atomic counters.
//!
//! Context guards use RAII for automatic cleanup on drop.

use serde::Serialize;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

thread_local! {
    static CURRENT_CONTEXT: RefCell<SynthesisContext> = const { RefCell::new(SynthesisContext::new()) };
}

/// Context snapshot for the current synthesis operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisContext {
    pub stage: Option<SynthesisStage>,
    /// Name of the source unit being processed
    pub unit: Option<String>,
    /// Qualified name of the symbol being processed
    pub symbol: Option<String>,
}

impl SynthesisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: None,
            unit: None,
            symbol: None,
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisStage {
    Analysis,
    Classification,
    Synthesis,
    Emission,
    Verification,
}

impl std::fmt::Display for SynthesisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analysis => write!(f, "analysis"),
            Self::Classification => write!(f, "classification"),
            Self::Synthesis => write!(f, "synthesis"),
            Self::Emission => write!(f, "emission"),
            Self::Verification => write!(f, "verification"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: SynthesisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut SynthesisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_stage(stage: SynthesisStage) -> ContextGuard {
    update(|ctx| ctx.stage = Some(stage))
}

#[must_use]
pub fn set_current_unit(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| {
        ctx.unit = Some(name);
        ctx.symbol = None;
    })
}

#[must_use]
pub fn set_current_symbol(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.symbol = Some(name))
}

#[must_use]
pub fn get_current_context() -> SynthesisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Reset the current thread's context to empty.
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = SynthesisContext::new();
    });
}

/// Progress counters for one batch, shared across worker threads.
#[derive(Debug, Default)]
pub struct BatchProgress {
    processed: AtomicUsize,
    failed: AtomicUsize,
    total: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Records one finished unit and returns the processed count so far.
    pub fn record(&self, succeeded: bool) -> usize {
        if !succeeded {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// (processed, failed, total)
    #[must_use]
    pub fn snapshot(&self) -> (usize, usize, usize) {
        (
            self.processed.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
            self.total,
        )
    }
}
