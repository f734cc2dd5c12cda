use std::path::Path;

use anyhow::{bail, Context};
use config as config_crate;
use serde::Deserialize;

use noc_core::domain::Incident;
use noc_core::report::sectors::DEFAULT_SECTOR_CATEGORY;
use noc_core::report::DEFAULT_TOP_N;
use noc_core::universe::EntityUniverse;

/// Environment variables with this prefix override file values (`NOC_TOP_N=10`).
pub const ENV_PREFIX: &str = "NOC";

/// Monitored entities of one category.
///
/// Kept as a list of tables rather than a map keyed by category: configuration keys are
/// case-folded on load, category names must not be.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UniverseEntry {
    pub category: String,
    #[serde(default)]
    pub entities: Vec<String>,
}

/// Operational settings of the report shell.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    #[serde(default)]
    pub entity_universe: Vec<UniverseEntry>,
    /// Also report every entity ever seen in the incident history.
    pub derive_universe_from_history: bool,
    pub top_n: usize,
    /// Category broken down by the sector report.
    pub sector_category: String,
    pub log_level: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            entity_universe: Vec::new(),
            derive_universe_from_history: true,
            top_n: DEFAULT_TOP_N,
            sector_category: DEFAULT_SECTOR_CATEGORY.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ReportConfig {
    /// Defaults, then the optional file (format by extension), then `NOC_*` variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut builder = config_crate::Config::builder()
            .set_default(
                "derive_universe_from_history",
                defaults.derive_universe_from_history,
            )?
            .set_default("top_n", defaults.top_n as i64)?
            .set_default("sector_category", defaults.sector_category)?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = path {
            builder = builder.add_source(config_crate::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config_crate::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| match path {
                Some(p) => format!("failed to load configuration from {}", p.display()),
                None => "failed to load configuration".to_string(),
            })?;
        let config: ReportConfig = settings
            .try_deserialize()
            .context("invalid report configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.top_n == 0 {
            bail!("top_n must be greater than zero");
        }
        if self.sector_category.trim().is_empty() {
            bail!("sector_category must not be empty");
        }
        if let Some(entry) = self.entity_universe.iter().find(|e| e.category.trim().is_empty()) {
            bail!(
                "entity_universe entry without a category (entities: {})",
                entry.entities.join(", ")
            );
        }
        Ok(())
    }

    /// Entities to report for `incidents`: the configured ones, plus history when enabled.
    pub fn universe(&self, incidents: &[Incident]) -> EntityUniverse {
        let configured = EntityUniverse::from_config(
            self.entity_universe
                .iter()
                .map(|e| (e.category.clone(), e.entities.clone())),
        );
        if self.derive_universe_from_history {
            EntityUniverse::derive_from_history(incidents).merged(&configured)
        } else {
            configured
        }
    }
}
