//! `coursehub validate` command: run the validation pipeline on a plan file
//! and print the report.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use coursehub_core::plan::{LoadedPlan, QuarterId, SemesterId, parse_plan_file};
use coursehub_core::validation::{MajorProgress, ValidationResult, validate_plan};
use coursehub_data::ReferenceTables;

use crate::config::OutputFormat;

/// Load a plan file from disk and check it against `reference`.
pub fn load_plan(reference: &ReferenceTables, plan_path: &Path) -> Result<LoadedPlan> {
    let content = std::fs::read_to_string(plan_path)
        .with_context(|| format!("failed to read plan file {}", plan_path.display()))?;
    parse_plan_file(&content, reference)
        .with_context(|| format!("invalid plan file {}", plan_path.display()))
}

/// Run the validate command.
pub fn run_validate(
    reference: &ReferenceTables,
    plan_path: &Path,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let loaded = load_plan(reference, plan_path)?;
    let result = validate_plan(&loaded.plan.validation_input(&loaded.profile), reference);

    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .context("failed to serialize validation result")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            writeln!(out, "Plan: {}", plan_path.display())?;
            render_text(&mut out, &loaded, &result)?;
        }
    }

    if strict && !result.is_valid {
        bail!(
            "plan is not valid: {} error(s) in {}",
            result.errors.len(),
            plan_path.display()
        );
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Text report
// -----------------------------------------------------------------------

/// Write the human-readable report for `result`.
pub fn render_text(
    out: &mut impl Write,
    loaded: &LoadedPlan,
    result: &ValidationResult,
) -> std::io::Result<()> {
    let grad = &result.graduation_progress;
    let status = if result.is_valid { "valid" } else { "invalid" };
    writeln!(out, "Status: {status}")?;
    writeln!(
        out,
        "Total CU: {} (graduation range {}-{}{})",
        result.total_cu,
        grad.minimum_cu,
        grad.maximum_cu,
        if grad.is_in_range { "" } else { ", out of range" }
    )?;
    if !loaded.plan.staging().is_empty() {
        writeln!(out, "Staging: {}", loaded.plan.staging().join(", "))?;
    }
    writeln!(out)?;

    let target = loaded.profile.cu_load_preference.target_cu_per_quarter();
    writeln!(
        out,
        "{:<8} {:>6} {:>8}  COURSES",
        "QUARTER", "CU", "TARGET"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;
    for quarter in QuarterId::ALL {
        let cu = loaded.plan.cu_for_quarter(quarter);
        let marker = if cu > target { " *" } else { "" };
        writeln!(
            out,
            "{:<8} {:>6.2} {:>8.2}  {}{marker}",
            quarter.as_str(),
            cu,
            target,
            loaded.plan.courses_in(quarter).join(", ")
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{:<16} {:>6}", "SEMESTER", "CU")?;
    writeln!(out, "{}", "-".repeat(23))?;
    for semester in SemesterId::ALL {
        writeln!(
            out,
            "{:<16} {:>6.2}",
            semester.label(),
            loaded.plan.cu_for_semester(semester)
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "{:<24} {:<10} {:>9}  COURSES",
        "CORE", "STATUS", "CU"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;
    for core in &result.core_progress {
        writeln!(
            out,
            "{:<24} {:<10} {:>9}  {}",
            core.core_code,
            core.status.to_string(),
            format!("{}/{}", core.credits_satisfied, core.credits_required),
            core.satisfying_courses.join(", ")
        )?;
    }

    if !result.major_progress.is_empty() {
        writeln!(out)?;
        writeln!(out, "Majors:")?;
        for major in &result.major_progress {
            render_major(out, major)?;
        }
    }

    if !result.errors.is_empty() {
        writeln!(out)?;
        writeln!(out, "Errors ({}):", result.errors.len())?;
        for error in &result.errors {
            writeln!(out, "  [{}] {}", error.kind, error.message)?;
        }
    }
    if !result.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings ({}):", result.warnings.len())?;
        for warning in &result.warnings {
            writeln!(
                out,
                "  [{}] [{}] {}",
                warning.severity, warning.kind, warning.message
            )?;
        }
    }
    Ok(())
}

fn render_major(out: &mut impl Write, major: &MajorProgress) -> std::io::Result<()> {
    writeln!(
        out,
        "  {} {}: {}/{} CU ({}%)",
        major.major_code,
        major.major_name,
        major.total_credits_satisfied,
        major.total_credits_required,
        major.percent_complete
    )?;
    if let Some(required) = &major.required_courses_progress {
        writeln!(
            out,
            "    required ({}): {}/{}{}",
            required.selection_type,
            required.credits_satisfied,
            required.credits_required,
            missing_suffix(&required.missing_courses)
        )?;
    }
    if let Some(electives) = &major.elective_courses_progress {
        writeln!(
            out,
            "    electives: {}/{}",
            electives.credits_satisfied, electives.credits_required
        )?;
    }
    for pillar in major.pillar_progress.iter().flatten() {
        writeln!(
            out,
            "    pillar {} {} ({}): {}/{}{}",
            pillar.pillar_code,
            pillar.pillar_name,
            pillar.credits_type,
            pillar.credits_satisfied,
            pillar.credits_required,
            missing_suffix(&pillar.missing_courses)
        )?;
    }
    Ok(())
}

fn missing_suffix(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!(", missing {}", missing.join(", "))
    }
}
