//! `coursehub data check` command: cross-check the datasets.

use std::io::Write;

use anyhow::{Context, Result, bail};

use coursehub_data::{ConsistencyReport, ReferenceTables, check_consistency};

use crate::config::OutputFormat;

/// Run the consistency check. Fails when any reference is unresolved.
pub fn run_check(reference: &ReferenceTables, format: OutputFormat) -> Result<()> {
    let report = check_consistency(reference);
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("failed to serialize consistency report")?;
            println!("{json}");
        }
        OutputFormat::Text => write_report(&mut std::io::stdout().lock(), &report)?,
    }

    if !report.is_clean() {
        bail!(
            "{} requirement reference(s) do not resolve in the catalog",
            report.unresolved.len()
        );
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &ConsistencyReport) -> std::io::Result<()> {
    if report.unresolved.is_empty() {
        writeln!(out, "All requirement course references resolve.")?;
    } else {
        writeln!(out, "{:<12} REFERENCED BY", "COURSE")?;
        writeln!(out, "{}", "-".repeat(40))?;
        for missing in &report.unresolved {
            writeln!(out, "{:<12} {}", missing.course_id, missing.referenced_by)?;
        }
    }
    if !report.unreferenced_courses.is_empty() {
        writeln!(
            out,
            "{} catalog course(s) are not used by any requirement.",
            report.unreferenced_courses.len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_data::UnresolvedReference;

    fn render(report: &ConsistencyReport) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn clean_report_says_so() {
        let out = render(&ConsistencyReport::default());
        assert_eq!(out, "All requirement course references resolve.\n");
    }

    #[test]
    fn unresolved_references_are_tabulated() {
        let report = ConsistencyReport {
            unresolved: vec![UnresolvedReference {
                course_id: "GHST9990".to_owned(),
                referenced_by: "major:FNCE".to_owned(),
            }],
            unreferenced_courses: vec!["MISC1000".to_owned()],
        };
        let out = render(&report);
        assert!(out.contains("GHST9990     major:FNCE"), "{out}");
        assert!(out.contains("1 catalog course(s)"));
    }

    #[test]
    fn embedded_datasets_pass_check() {
        run_check(&ReferenceTables::embedded(), OutputFormat::Json).unwrap();
    }
}
