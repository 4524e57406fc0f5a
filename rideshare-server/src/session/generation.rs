//! Generation tags for discarding superseded async work.

use std::fmt;

/// Identifies one dispatched resolution within a session.
///
/// Generations only ever increase. A task captures the generation current at
/// dispatch and may commit its result only if that generation is still
/// current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Monotonic source of [`Generation`]s for one session.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate everything dispatched so far and return the new tag.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0 + 1);
        self.current
    }

    pub fn current(&self) -> Generation {
        self.current
    }

    /// Whether work tagged with `generation` may still commit.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}
