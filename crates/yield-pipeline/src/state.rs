use std::fmt;

/// Phases of a single pipeline run.
///
/// The happy path is strictly linear. Any non-terminal phase may move to
/// `Failed`; `Done` and `Failed` have no outgoing transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPhase {
    #[default]
    Start,
    Approving,
    PoolResolving,
    Swapping,
    BalanceReading,
    Depositing,
    Done,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed)
    }

    /// Successor on the happy path
    pub fn next(&self) -> Option<RunPhase> {
        match self {
            RunPhase::Start => Some(RunPhase::Approving),
            RunPhase::Approving => Some(RunPhase::PoolResolving),
            RunPhase::PoolResolving => Some(RunPhase::Swapping),
            RunPhase::Swapping => Some(RunPhase::BalanceReading),
            RunPhase::BalanceReading => Some(RunPhase::Depositing),
            RunPhase::Depositing => Some(RunPhase::Done),
            RunPhase::Done | RunPhase::Failed => None,
        }
    }

    pub fn can_transition_to(&self, to: RunPhase) -> bool {
        !self.is_terminal() && (to == RunPhase::Failed || self.next() == Some(to))
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Start => "start",
            RunPhase::Approving => "approving",
            RunPhase::PoolResolving => "pool-resolving",
            RunPhase::Swapping => "swapping",
            RunPhase::BalanceReading => "balance-reading",
            RunPhase::Depositing => "depositing",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Phase tracking for one run
#[derive(Debug, Clone)]
pub struct RunState {
    phase: RunPhase,
    history: Vec<RunPhase>,
    /// Phase that was active when the run failed
    failed_in: Option<RunPhase>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Start,
            history: vec![RunPhase::Start],
            failed_in: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn history(&self) -> &[RunPhase] {
        &self.history
    }

    pub fn failed_in(&self) -> Option<RunPhase> {
        self.failed_in
    }

    /// Move to `to`. Returns false and leaves the state untouched when the
    /// transition is not allowed.
    pub fn advance(&mut self, to: RunPhase) -> bool {
        if !self.phase.can_transition_to(to) {
            return false;
        }
        if to == RunPhase::Failed {
            self.failed_in = Some(self.phase);
        }
        self.phase = to;
        self.history.push(to);
        true
    }

    pub fn fail(&mut self) -> bool {
        self.advance(RunPhase::Failed)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
