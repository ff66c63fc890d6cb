//! # Status Document
//!
//! Building, comparing and writing ClusterOperator status documents.
//!
//! ## Sub-modules
//!
//! - `condition` - Well-known condition types, reasons and lookups
//! - `builder` - Owned accumulator producing a status document
//! - `defaults` - Default conditions, versions and related objects
//! - `writer` - Conditional status writes

pub mod builder;
pub mod condition;
pub mod defaults;
pub mod writer;

pub use builder::StatusBuilder;
pub use condition::{condition_types, find_status_condition, is_status_condition, reasons};
pub use writer::{StatusWriter, WriteOutcome};
