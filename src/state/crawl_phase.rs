//! Lifecycle phases of a crawl run

use std::fmt;

/// Current phase of the crawl driver
///
/// A run moves `Idle -> Running -> Completed`. There is no interrupted phase:
/// a process killed mid-run simply leaves the last persisted progress behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Cursor resolved, nothing fetched yet
    Idle,

    /// Walking listing pages
    Running,

    /// Page loop exited and results were written
    Completed,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Completed)
        )
    }

    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}
