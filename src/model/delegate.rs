use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelegateKind {
    HardwareAccelerator,
    Gpu,
    Cpu,
}

impl fmt::Display for DelegateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelegateKind::HardwareAccelerator => write!(f, "hardware accelerator"),
            DelegateKind::Gpu => write!(f, "GPU"),
            DelegateKind::Cpu => write!(f, "CPU"),
        }
    }
}

/// Settings handed to the backend when the interpreter is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterOptions {
    pub num_threads: usize,
    pub delegate: DelegateKind,
}

impl InterpreterOptions {
    /// Multi-threaded CPU options, one worker per available core.
    pub fn cpu_baseline() -> Self {
        let num_threads = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            num_threads,
            delegate: DelegateKind::Cpu,
        }
    }
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self::cpu_baseline()
    }
}

/// One hardware backend that may or may not be usable on this device.
pub trait Delegate: Send + Sync {
    fn kind(&self) -> DelegateKind;

    /// Prepares `options` for this delegate, or explains why it cannot be used.
    fn attach(&self, options: &mut InterpreterOptions) -> Result<(), AppError>;
}

type AttachFn = dyn Fn(&mut InterpreterOptions) -> Result<(), AppError> + Send + Sync;

/// A delegate assembled from a closure.
pub struct DelegateAttempt {
    kind: DelegateKind,
    attach: Box<AttachFn>,
}

impl DelegateAttempt {
    pub fn new<F>(kind: DelegateKind, attach: F) -> Self
    where
        F: Fn(&mut InterpreterOptions) -> Result<(), AppError> + Send + Sync + 'static,
    {
        Self {
            kind,
            attach: Box::new(attach),
        }
    }
}

impl Delegate for DelegateAttempt {
    fn kind(&self) -> DelegateKind {
        self.kind
    }

    fn attach(&self, options: &mut InterpreterOptions) -> Result<(), AppError> {
        (self.attach)(options)
    }
}

/// Tries `delegates` in order and binds the first one that attaches.
///
/// Every attempt works on a copy of `options`, so a delegate that fails halfway leaves no
/// trace. A panic inside `attach` counts as a failed attempt. When nothing attaches the
/// options stay on the CPU baseline.
pub fn probe_delegates(
    options: &mut InterpreterOptions,
    delegates: &[Box<dyn Delegate>],
) -> DelegateKind {
    for delegate in delegates {
        let kind = delegate.kind();
        let mut candidate = options.clone();
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| delegate.attach(&mut candidate)));
        match attempt {
            Ok(Ok(())) => {
                candidate.delegate = kind;
                *options = candidate;
                info!("Attached {} delegate", kind);
                return kind;
            }
            Ok(Err(e)) => debug!("Skipping {} delegate: {}", kind, e),
            Err(_) => warn!("{} delegate panicked while attaching, skipping", kind),
        }
    }

    options.delegate = DelegateKind::Cpu;
    info!(
        "No accelerator attached, using CPU with {} threads",
        options.num_threads
    );
    DelegateKind::Cpu
}
