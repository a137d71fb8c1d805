//! `coursehub cores`, `coursehub majors` and `coursehub course`: browse the
//! reference data.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use coursehub_data::models::Course;
use coursehub_data::{ReferenceData, ReferenceTables};

use crate::config::OutputFormat;

/// One course with everything it counts toward.
#[derive(Debug, Serialize)]
struct CourseDetail<'a> {
    #[serde(flatten)]
    course: &'a Course,
    core_requirements: Vec<&'a str>,
    majors: Vec<&'a str>,
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Run the cores command.
pub fn run_cores(reference: &ReferenceTables, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&reference.core_requirements()),
        OutputFormat::Text => Ok(write_cores(&mut std::io::stdout().lock(), reference)?),
    }
}

fn write_cores(out: &mut impl Write, reference: &ReferenceTables) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<24} {:<6} {:>5} {:<8}  NAME",
        "CODE", "TYPE", "CU", "WAIVABLE"
    )?;
    writeln!(out, "{}", "-".repeat(76))?;
    for req in reference.core_requirements() {
        writeln!(
            out,
            "{:<24} {:<6} {:>5} {:<8}  {}",
            req.core_code,
            req.core_type.to_string(),
            req.credits_required,
            if req.waivable { "yes" } else { "no" },
            req.core_name
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total core CU: {}", reference.total_core_credits())?;
    Ok(())
}

/// Run the majors command.
pub fn run_majors(reference: &ReferenceTables, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&reference.majors()),
        OutputFormat::Text => Ok(write_majors(&mut std::io::stdout().lock(), reference)?),
    }
}

fn write_majors(out: &mut impl Write, reference: &ReferenceTables) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<6} {:<18} {:>5}  NAME",
        "CODE", "STRUCTURE", "CU"
    )?;
    writeln!(out, "{}", "-".repeat(64))?;
    for major in reference.majors() {
        writeln!(
            out,
            "{:<6} {:<18} {:>5}  {}",
            major.major_code,
            major.requirements.tag(),
            major.total_credits_required,
            major.major_name
        )?;
    }
    Ok(())
}

/// Run the course command.
pub fn run_course(reference: &ReferenceTables, course_id: &str, format: OutputFormat) -> Result<()> {
    let detail = course_detail(reference, course_id)?;
    match format {
        OutputFormat::Json => print_json(&detail),
        OutputFormat::Text => Ok(write_course(&mut std::io::stdout().lock(), &detail)?),
    }
}

fn course_detail<'a>(reference: &'a ReferenceTables, course_id: &str) -> Result<CourseDetail<'a>> {
    let course = reference
        .resolve_course(course_id)
        .with_context(|| format!("course {course_id} not found in catalog"))?;
    Ok(CourseDetail {
        course,
        core_requirements: reference
            .core_requirements_for_course(course_id)
            .into_iter()
            .map(|r| r.core_code.as_str())
            .collect(),
        majors: reference.majors_for_course(course_id),
    })
}

fn write_course(out: &mut impl Write, detail: &CourseDetail<'_>) -> std::io::Result<()> {
    let course = detail.course;
    writeln!(out, "Course: {} {}", course.course_id, course.title)?;
    writeln!(out, "  Department: {}", course.department)?;
    writeln!(out, "  CU:         {}", course.credit_units)?;
    match course.term_availability {
        Some(term) => writeln!(out, "  Offered:    {term}")?,
        None => writeln!(out, "  Offered:    -")?,
    }
    writeln!(out, "  Wharton:    {}", if course.is_wharton { "yes" } else { "no" })?;
    writeln!(out, "  Cores:      {}", list_or_dash(&detail.core_requirements))?;
    writeln!(out, "  Majors:     {}", list_or_dash(&detail.majors))?;
    Ok(())
}

fn list_or_dash(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_owned()
    } else {
        items.join(", ")
    }
}
