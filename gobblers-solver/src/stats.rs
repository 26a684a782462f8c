//! Counters and timings collected across a solve run.

use std::time::Duration;

/// Statistics from the two solver phases.
#[derive(Debug, Default)]
pub struct SolverStats {
    /// Canonical states reached by the forward search.
    pub reachable_states: u64,
    /// Reachable states that were already over when first visited.
    pub terminal_states: u64,
    /// Win/loss states established by backward propagation.
    pub solved_states: u64,
    /// Wall-clock time of the forward search.
    pub search_time: Duration,
    /// Wall-clock time of the backward propagation.
    pub propagate_time: Duration,
}

impl SolverStats {
    /// One-line summary for the end of a solve.
    pub fn summary(&self) -> String {
        format!(
            "{} reachable states ({} terminal), {} solved by propagation; \
             search {:.2}s, propagation {:.2}s",
            self.reachable_states,
            self.terminal_states,
            self.solved_states,
            self.search_time.as_secs_f64(),
            self.propagate_time.as_secs_f64(),
        )
    }
}
