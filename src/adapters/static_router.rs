//! Fixed-blueprint router.
//!
//! Hands back one pre-built blueprint regardless of the query. Backs the CLI
//! path where the caller supplies a blueprint file instead of routing text.

use crate::domain::blueprint::ExecutionBlueprint;
use crate::domain::error::RegimixError;
use crate::ports::router_port::IntentRouter;

pub struct StaticRouter {
    blueprint: ExecutionBlueprint,
}

impl StaticRouter {
    pub fn new(blueprint: ExecutionBlueprint) -> Self {
        Self { blueprint }
    }
}

impl IntentRouter for StaticRouter {
    fn parse_intent(&self, _query: &str) -> Result<ExecutionBlueprint, RegimixError> {
        Ok(self.blueprint.clone())
    }
}
