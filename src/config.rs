//! Planner configuration loaded from TOML
//!
//! Every section falls back to its default, so an empty file (or no file at
//! all) reproduces the stock batch report for VBO Kavalur.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constraints::{ConstraintSet, ConstraintSpec};
use crate::error::Result;
use crate::night::WindowPolicy;
use crate::pipeline::TransitPlanner;
use crate::site::Site;
use crate::target::PreFilter;
use crate::utils::config::{DEFAULT_CHART_REFERENCE, DEFAULT_CURVE_SAMPLES, DEFAULT_MIN_ALTITUDE_DEG};

/// Single-target chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// UT clock time on the observing date from which sunset is searched
    pub reference: String,
    /// Number of altitude samples between sunset and sunrise
    pub samples: usize,
    /// Sun-centre altitude that counts as sunset/sunrise
    pub horizon_deg: f64,
    /// Altitude drawn as the observing limit
    pub altitude_limit_deg: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            reference: DEFAULT_CHART_REFERENCE.to_string(),
            samples: DEFAULT_CURVE_SAMPLES,
            horizon_deg: 0.0,
            altitude_limit_deg: DEFAULT_MIN_ALTITUDE_DEG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub site: Site,
    pub prefilter: PreFilter,
    pub constraints: Vec<ConstraintSpec>,
    pub window: WindowPolicy,
    pub chart: ChartConfig,
    /// Catalog path; the command line takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Observing date `YYYY-MM-DD`; the command line takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            site: Site::default(),
            prefilter: PreFilter::default(),
            constraints: ConstraintSpec::default_set(),
            window: WindowPolicy::default(),
            chart: ChartConfig::default(),
            catalog: None,
            date: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading planner config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn constraint_set(&self) -> ConstraintSet {
        ConstraintSet::from_specs(&self.constraints)
    }

    /// Planner for this site, pre-filter and constraint set
    pub fn planner(&self) -> Result<TransitPlanner> {
        TransitPlanner::new(
            self.site.clone(),
            self.prefilter.clone(),
            self.constraint_set(),
        )
    }
}
