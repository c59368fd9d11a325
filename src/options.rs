//! Analysis tunables, optionally loaded from a YAML file.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUMERIC_SAMPLE: usize = 10;
pub const DEFAULT_TOP_CATEGORIES: usize = 10;
pub const DEFAULT_GROWTH_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Non-missing values inspected when deciding whether a text column holds numbers.
    pub numeric_sample: usize,
    /// Maximum entries in the category series.
    pub top_categories: usize,
    /// Length of each growth comparison window.
    pub growth_window_days: i64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            numeric_sample: DEFAULT_NUMERIC_SAMPLE,
            top_categories: DEFAULT_TOP_CATEGORIES,
            growth_window_days: DEFAULT_GROWTH_WINDOW_DAYS,
        }
    }
}

impl AnalysisOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening options file {path:?}"))?;
        let options: Self = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing options YAML {path:?}"))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(contents).context("Parsing options YAML")?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.numeric_sample > 0, "numeric_sample must be at least 1");
        ensure!(self.top_categories > 0, "top_categories must be at least 1");
        ensure!(
            self.growth_window_days > 0,
            "growth_window_days must be at least 1"
        );
        Ok(())
    }
}
