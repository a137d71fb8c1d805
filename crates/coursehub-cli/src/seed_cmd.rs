//! `coursehub seed` command: generate a starting plan file for a profile.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use coursehub_core::plan::{PlanFile, generate_initial_plan};
use coursehub_core::profile::{StudentProfile, WaiverConfig, WaiverType};
use coursehub_data::ReferenceTables;

/// Parse a `CODE:TYPE[:COURSE]` waiver argument.
pub fn parse_waiver_arg(raw: &str) -> Result<WaiverConfig, String> {
    let mut parts = raw.splitn(3, ':');
    let code = parts.next().unwrap_or_default().trim();
    let kind = parts
        .next()
        .ok_or_else(|| format!("expected CODE:TYPE[:COURSE], got {raw:?}"))?;
    if code.is_empty() {
        return Err(format!("missing core code in {raw:?}"));
    }
    let waiver_type: WaiverType = kind.trim().parse().map_err(|e| format!("{e}"))?;

    let mut waiver = WaiverConfig::new(code, waiver_type);
    waiver.substitution_course_id = parts
        .next()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned);
    Ok(waiver)
}

/// Run the seed command. Writes the plan file to `output`, or stdout.
pub fn run_seed(
    reference: &ReferenceTables,
    profile: StudentProfile,
    output: Option<&Path>,
) -> Result<()> {
    profile
        .validate(reference)
        .context("invalid student profile")?;

    let plan = generate_initial_plan(&profile, reference);
    let content = PlanFile::from_plan(&profile, &plan)
        .to_toml_string()
        .context("failed to serialize plan file")?;

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("cannot write plan file {}", path.display()))?;
            println!(
                "Seeded plan written to {} ({} courses, {} CU)",
                path.display(),
                plan.all_course_ids().len(),
                plan.total_cu()
            );
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(content.as_bytes())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_core::plan::parse_plan_file;
    use coursehub_core::profile::CuLoadPreference;

    #[test]
    fn parses_waiver_arguments() {
        let w = parse_waiver_arg("STAT_CORE:placement").unwrap();
        assert_eq!(w.core_code, "STAT_CORE");
        assert_eq!(w.waiver_type, WaiverType::Placement);
        assert!(w.substitution_course_id.is_none());

        let w = parse_waiver_arg("ACCT_FLEX:substitution:ACCT7470").unwrap();
        assert_eq!(w.waiver_type, WaiverType::Substitution);
        assert_eq!(w.substitution_course_id.as_deref(), Some("ACCT7470"));
    }

    #[test]
    fn rejects_malformed_waiver_arguments() {
        assert!(parse_waiver_arg("STAT_CORE").is_err());
        assert!(parse_waiver_arg(":waiver").is_err());
        let err = parse_waiver_arg("STAT_CORE:exempt").unwrap_err();
        assert!(err.contains("invalid waiver type"), "{err}");
    }

    #[test]
    fn seed_writes_loadable_plan_file() {
        let tables = ReferenceTables::embedded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.toml");
        let profile = StudentProfile {
            majors: vec!["MKTG".to_owned()],
            cu_load_preference: CuLoadPreference::Light,
            waivers: vec![WaiverConfig::new("ACCT_FLEX", WaiverType::Waiver)],
        };

        run_seed(&tables, profile.clone(), Some(&path)).unwrap();

        let loaded = parse_plan_file(&std::fs::read_to_string(&path).unwrap(), &tables).unwrap();
        assert_eq!(loaded.profile, profile);
        assert!(!loaded.plan.contains("ACCT6130"));
        assert!(loaded.plan.contains("MGMT6100"));
    }

    #[test]
    fn seed_rejects_invalid_profile() {
        let tables = ReferenceTables::embedded();
        let profile = StudentProfile {
            waivers: vec![WaiverConfig::new("NOT_A_CORE", WaiverType::Waiver)],
            ..Default::default()
        };
        let err = run_seed(&tables, profile, None).unwrap_err();
        assert!(err.to_string().contains("invalid student profile"), "{err}");
    }
}
