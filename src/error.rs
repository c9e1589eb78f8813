//! Error types.
//!
//! The runtime has no recoverable failure modes of its own: completion,
//! suspension, and yield are return values, not errors. What remains is
//! a small set of programming errors that are reported deterministically
//! (as panic payloads) plus budget exhaustion in the lab harness.

use core::fmt;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A combinator addressed a slot beyond the tree's capacity.
    ///
    /// Nesting depth is a static property of the combinator expression,
    /// so this always indicates a tree built too shallow for the
    /// program running on it.
    DepthOverflow,
    /// A resumed task found locals of a different type in its frame.
    ///
    /// A frame's locals may be replaced between invocations (slots are
    /// reused by successive call sites) but never mid-invocation.
    LocalsTypeMismatch,
    /// A lab run exhausted its pass budget before the root completed.
    Stalled,
}

/// Error type for runtime misuse and lab budget exhaustion.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Adds deterministic context text to the error.
    #[must_use]
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }

    /// A slot address fell outside the tree.
    #[must_use]
    pub fn depth_overflow(slot: u16, depth: u16) -> Self {
        Self::new(ErrorKind::DepthOverflow).with_context(format!(
            "slot {slot} is outside a tree of depth {depth} ({} slots)",
            (1u32 << depth) - 1
        ))
    }

    /// A frame held locals of an unexpected type.
    #[must_use]
    pub fn locals_mismatch(slot: u16) -> Self {
        Self::new(ErrorKind::LocalsTypeMismatch)
            .with_context(format!("frame at slot {slot} resumed with foreign locals"))
    }

    /// A lab run used up its pass budget.
    #[must_use]
    pub fn stalled(passes: u64) -> Self {
        Self::new(ErrorKind::Stalled)
            .with_context(format!("root task not done after {passes} passes"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::DepthOverflow => write!(f, "task tree depth exceeded")?,
            ErrorKind::LocalsTypeMismatch => write!(f, "frame locals type mismatch")?,
            ErrorKind::Stalled => write!(f, "pass budget exhausted")?,
        }
        if let Some(ctx) = &self.context {
            write!(f, ": {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
