//! Degree-plan model and validation for CourseHub.
//!
//! [`plan`] holds the editable plan and its file format, [`profile`] the
//! student's majors and waivers, and [`validation`] the pipeline that turns
//! a plan snapshot into a [`validation::ValidationResult`].

pub mod plan;
pub mod profile;
pub mod validation;
