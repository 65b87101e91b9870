//! Intent routing port trait.

use crate::domain::blueprint::ExecutionBlueprint;
use crate::domain::error::RegimixError;

pub trait IntentRouter {
    /// Turn a query into an execution blueprint. Failure is fatal to the
    /// call; the engine never falls back to a default plan.
    fn parse_intent(&self, query: &str) -> Result<ExecutionBlueprint, RegimixError>;
}
