//! Compliance evaluation and recommendation engine for municipal business
//! inspections.
//!
//! The surrounding record keeper (establishment registries, scheduling,
//! report export) lives elsewhere; this crate owns the checklist engine:
//! answer polarity classification, conditional follow-up field lifecycles,
//! document expiry tracking, automated remediation recommendations, and the
//! derived compliance verdict handed off at submission.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
