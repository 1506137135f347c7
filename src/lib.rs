//! TRT: Transit Reconciliation Toolkit
//!
//! A Unix-style toolkit for reconciling CSV exports from external
//! operational tools into a plain-text register of transport work items,
//! with inferred column mappings and a field-level audit trail.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod entities;
pub mod ingest;
pub mod reconcile;
