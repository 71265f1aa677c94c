//! Common fixtures for vizkit integration tests
//!
//! [`TestRegistry`] lays out a registry on disk and exposes it as a `file://`
//! URL; [`TestProject`] ties a registry to an empty consuming project and
//! builds isolated `vizkit` invocations against both.

// Not every test file uses every helper.
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Source of `recharts/generic/timeseries-line-v1` in the fixture registry.
pub const TIMESERIES_LINE: &str = r#""use client";

import * as React from "react";
import { LineChart, Line, XAxis, YAxis } from "recharts";
import { ChartCard } from "@/viz/ui/chart-card";
import { ChartTooltip } from "@/viz/ui/chart-tooltip";
import { formatDate } from "@/viz/utils/format-date";

export function TimeseriesLineV1({ data }) {
  return (
    <ChartCard>
      <LineChart data={data}>
        <XAxis dataKey="date" tickFormatter={formatDate} />
        <YAxis />
        <Line dataKey="value" />
        <ChartTooltip />
      </LineChart>
    </ChartCard>
  );
}
"#;

pub struct TestRegistry {
    root: PathBuf,
}

impl TestRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Write `content` at `relative` (e.g. `ui/legend.tsx`).
    pub fn add_file(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn remove_file(&self, relative: &str) -> Result<()> {
        fs::remove_file(self.root.join(relative))?;
        Ok(())
    }

    /// Registry with the timeseries line component and all of its files.
    pub fn with_timeseries_line(self) -> Result<Self> {
        self.add_file("components/recharts/generic/timeseries-line-v1.tsx", TIMESERIES_LINE)?;
        self.add_file("ui/chart-card.tsx", "export function ChartCard() {}\n")?;
        self.add_file("ui/chart-tooltip.tsx", "export function ChartTooltip() {}\n")?;
        self.add_file("utils/format-date.ts", "export const formatDate = (d) => `${d}`;\n")?;
        Ok(self)
    }

    pub fn url(&self) -> String {
        url::Url::from_directory_path(&self.root)
            .map(|url| url.to_string())
            .unwrap_or_else(|()| panic!("not an absolute path: {}", self.root.display()))
    }
}

pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    registry: TestRegistry,
    global_config: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;

        let registry = TestRegistry::new(temp_dir.path().join("registry"))?;

        // Keeps the developer's ~/.vizkit/config.toml out of the tests.
        let global_config = temp_dir.path().join("config.toml");
        fs::write(&global_config, "")?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            registry,
            global_config,
        })
    }

    pub fn with_timeseries_line() -> Result<Self> {
        let mut project = Self::new()?;
        project.registry = project.registry.with_timeseries_line()?;
        Ok(project)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn registry(&self) -> &TestRegistry {
        &self.registry
    }

    /// `<project>/src/viz`, the default root.
    pub fn viz_dir(&self) -> PathBuf {
        self.project_dir.join("src").join("viz")
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.viz_dir().join(relative))?)
    }

    /// A `vizkit` command running in the project against the fixture registry.
    pub fn vizkit(&self) -> Command {
        let mut cmd = Command::cargo_bin("vizkit").unwrap();
        cmd.current_dir(&self.project_dir)
            .env("VIZKIT_CONFIG", &self.global_config)
            .env("VIZKIT_REGISTRY_URL", self.registry.url())
            .env("VIZKIT_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `vizkit add <component>` without running a package manager.
    pub fn add(&self, component: &str) -> Command {
        let mut cmd = self.vizkit();
        cmd.args(["add", component, "--no-install"]);
        cmd
    }
}
