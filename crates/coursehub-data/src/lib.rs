//! Reference data for the CourseHub validation engine: the course catalog
//! and the core and major requirement definitions.

pub mod check;
pub mod models;
pub mod tables;

pub use check::{ConsistencyReport, UnresolvedReference, check_consistency};
pub use tables::{DataError, ReferenceData, ReferenceTables};
