//! regimix: deterministic regime-classification orchestrator.
//!
//! Executes a blueprint of frozen regime functions over price series, folds
//! their binary outputs through logic gates, aggregates across assets, and
//! can iterate majority-vote smoothing until the classification is stable.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
