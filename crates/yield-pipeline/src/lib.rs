mod approval;
mod deposit;
mod error;
mod notify;
mod orchestrator;
mod pool_resolver;
mod state;
mod swap;

#[cfg(test)]
mod mock;

pub use approval::ApprovalStep;
pub use deposit::{DepositApproval, YieldDepositor};
pub use error::{DepositStage, PipelineError, Result};
pub use notify::{format_report, TelegramNotifier};
pub use orchestrator::{Pipeline, RunReport};
pub use pool_resolver::PoolResolver;
pub use state::{RunPhase, RunState};
pub use swap::{deadline_from_now, SwapExecutor};
