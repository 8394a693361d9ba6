//! Allocation engine for fleet delivery staffing.
//!
//! The crate is a library-style core invoked in-process by the surrounding
//! delivery workflow: it owns qualification rules, candidate scoring,
//! allocation orchestration, and pre-commit validation, while persistence,
//! notification transport, and the HTTP surface remain external
//! collaborators behind the traits in `workflows::allocation::repository`.

pub mod config;
pub mod telemetry;
pub mod workflows;
