//! Engine configuration.

use std::time::Duration;

/// Timeout budget for the engine's public operations.
///
/// The engine is invoked from request-handling contexts; each call must
/// complete or abort within this budget, with cancellation propagated
/// to every underlying storage call.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Total budget per public operation (AddCart, ConfirmOrder).
    pub op_timeout: Duration,
}

impl EngineConfig {
    /// Create a configuration with the given per-operation budget.
    pub fn new(op_timeout: Duration) -> Self {
        Self { op_timeout }
    }

    /// Create with an aggressive budget (for latency-critical paths).
    pub fn aggressive() -> Self {
        Self {
            op_timeout: Duration::from_millis(250),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            op_timeout: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        assert_eq!(EngineConfig::default().op_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_aggressive_is_tighter() {
        assert!(EngineConfig::aggressive().op_timeout < EngineConfig::default().op_timeout);
    }
}
