use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a whole crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Coordinator built, nothing queued yet
    Idle,

    /// Workers are pulling records off the queue
    Running,

    /// Queue is empty or the run was cancelled; waiting on workers to exit
    Draining,

    /// Every worker has exited
    Terminated,
}

impl RunState {
    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Draining => 2,
            Self::Terminated => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Draining,
            _ => Self::Terminated,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        };
        write!(f, "{}", name)
    }
}

/// Run state shared between the coordinator and its workers
///
/// The state only ever moves forward; a worker that sees the queue run dry
/// and the coordinator reacting to cancellation may both request `Draining`.
#[derive(Debug)]
pub struct SharedRunState(AtomicU8);

impl SharedRunState {
    pub fn new() -> Self {
        Self(AtomicU8::new(RunState::Idle.as_u8()))
    }

    pub fn get(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves to `next` if it is ahead of the current state
    ///
    /// Returns true if this call performed the transition.
    pub fn advance(&self, next: RunState) -> bool {
        let target = next.as_u8();
        self.0.fetch_max(target, Ordering::AcqRel) < target
    }
}

impl Default for SharedRunState {
    fn default() -> Self {
        Self::new()
    }
}
