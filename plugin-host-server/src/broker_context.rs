//! Deploy/destroy brokering deadline.
//!
//! Mirrors the shared-deadline idea `call_function` enforces with the
//! `CALL_DEADLINE` task-local: one deadline set at the outermost brokered
//! call, threaded through `deploy_resource`/`destroy_resource` and the
//! stabilisation poll loop so none of them can individually outlive the
//! call chain's overall budget.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Clone, Copy)]
pub struct BrokerContext {
    deadline: Instant,
}

impl BrokerContext {
    /// Starts a new brokered call chain with a fresh deadline.
    pub fn new(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the shared deadline. Zero, never negative, once it
    /// has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remaining_reaches_zero_and_stays_there() {
        let ctx = BrokerContext::new(Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }
}
