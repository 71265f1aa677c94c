use anyhow::Result;
use predicates::prelude::*;
use std::fs;

mod common;
use common::{TIMESERIES_LINE, TestProject};

const COMPONENT: &str = "recharts/generic/timeseries-line-v1";

#[test]
fn test_add_timeseries_line_end_to_end() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;

    project
        .add(COMPONENT)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"import { TimeseriesLineV1 } from "@/viz/components/recharts/generic/timeseries-line-v1""#,
        ))
        .stdout(predicate::str::contains("npm install react recharts"));

    assert_eq!(project.read("components/recharts/generic/timeseries-line-v1.tsx")?, TIMESERIES_LINE);
    assert_eq!(project.read("ui/chart-card.tsx")?, "export function ChartCard() {}\n");
    assert_eq!(project.read("ui/chart-tooltip.tsx")?, "export function ChartTooltip() {}\n");
    assert!(project.viz_dir().join("utils").join("format-date.ts").is_file());
    Ok(())
}

#[test]
fn test_second_add_keeps_existing_dependencies() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;
    project.add(COMPONENT).assert().success();

    let card = project.viz_dir().join("ui").join("chart-card.tsx");
    fs::write(&card, "// locally customized\n")?;
    let component = project
        .viz_dir()
        .join("components/recharts/generic/timeseries-line-v1.tsx");
    fs::write(&component, "// stale\n")?;

    project
        .add(COMPONENT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped ui chart-card"))
        .stdout(predicate::str::contains("Created").not());

    assert_eq!(fs::read_to_string(&card)?, "// locally customized\n");
    // The component file itself is always refreshed.
    assert_eq!(fs::read_to_string(&component)?, TIMESERIES_LINE);
    Ok(())
}

#[test]
fn test_missing_dependency_is_a_warning() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;
    project.registry().remove_file("ui/chart-tooltip.tsx")?;

    project
        .add(COMPONENT)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stderr(predicate::str::contains("chart-tooltip"));

    assert!(!project.viz_dir().join("ui").join("chart-tooltip.tsx").exists());
    assert!(project.viz_dir().join("ui").join("chart-card.tsx").is_file());
    assert!(project.viz_dir().join("utils").join("format-date.ts").is_file());
    Ok(())
}

#[test]
fn test_missing_component_fails_without_writing() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;

    project
        .add("recharts/generic/does-not-exist")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Created"))
        .stderr(predicate::str::contains("Failed to download component"));

    let component_dir = project.viz_dir().join("components/recharts/generic");
    assert_eq!(fs::read_dir(&component_dir)?.count(), 0);
    assert_eq!(fs::read_dir(project.viz_dir().join("ui"))?.count(), 0);
    Ok(())
}

#[test]
fn test_invalid_identifier_fails_before_any_io() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;

    for bad in ["recharts/timeseries-line-v1", "a/b/c/d", "a//c", "../../etc"] {
        project
            .add(bad)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid component identifier"));
    }

    assert!(!project.viz_dir().exists());
    Ok(())
}

#[test]
fn test_install_failure_is_a_warning() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;
    let empty_path = project.project_dir().join("no-bin");
    fs::create_dir_all(&empty_path)?;

    project
        .vizkit()
        .env("PATH", &empty_path)
        .args(["add", COMPONENT, "--package-manager", "pnpm"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Package installation failed"))
        .stderr(predicate::str::contains("pnpm add react recharts"));

    assert!(project.viz_dir().join("ui").join("chart-card.tsx").is_file());
    Ok(())
}

#[test]
fn test_lockfile_selects_package_manager() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;
    fs::write(project.project_dir().join("yarn.lock"), "")?;

    project
        .add(COMPONENT)
        .assert()
        .success()
        .stdout(predicate::str::contains("yarn add react recharts"));
    Ok(())
}

#[test]
fn test_custom_root_from_project_config() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;
    fs::write(project.project_dir().join("vizkit.toml"), "root = \"app/charts\"\n")?;

    project.add(COMPONENT).assert().success();

    let root = project.project_dir().join("app").join("charts");
    assert!(root.join("components/recharts/generic/timeseries-line-v1.tsx").is_file());
    assert!(root.join("ui").join("chart-card.tsx").is_file());
    assert!(!project.viz_dir().exists());
    Ok(())
}

#[test]
fn test_quiet_suppresses_status_output() -> Result<()> {
    let project = TestProject::with_timeseries_line()?;

    project
        .vizkit()
        .args(["--quiet", "add", COMPONENT, "--no-install"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}
