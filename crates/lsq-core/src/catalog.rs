use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::mission::Mission;
use crate::scenario::Scenario;
use crate::validate::{ValidationIssue, validate_content};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// On-disk shape of a catalog document.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    missions: Vec<Mission>,
    #[serde(default)]
    scenarios: Vec<Scenario>,
}

/// The read-only content catalog: an ordered mission sequence and an
/// independent ordered scenario sequence.
///
/// A `Catalog` can only be obtained through validation, so every mission and
/// step in it has its answer among its options and every scenario has steps.
#[derive(Debug, Clone)]
pub struct Catalog {
    missions: Vec<Mission>,
    scenarios: Vec<Scenario>,
    warnings: Vec<ValidationIssue>,
}

impl Catalog {
    /// Validate and freeze a set of missions and scenarios.
    pub fn new(missions: Vec<Mission>, scenarios: Vec<Scenario>) -> CatalogResult<Self> {
        let issues = validate_content(&missions, &scenarios);
        if issues.iter().any(|i| i.is_error) {
            return Err(CatalogError::Invalid(issues));
        }
        Ok(Self {
            missions,
            scenarios,
            warnings: issues,
        })
    }

    /// The catalog bundled with the application.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from a JSON document.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::new(doc.missions, doc.scenarios)
    }

    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize the catalog back to pretty JSON.
    pub fn to_json(&self) -> CatalogResult<String> {
        let doc = CatalogDocument {
            missions: self.missions.clone(),
            scenarios: self.scenarios.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// All missions in order.
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    /// Number of missions (the "all complete" pointer value).
    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    /// Get a mission by position.
    pub fn mission(&self, index: usize) -> Option<&Mission> {
        self.missions.get(index)
    }

    /// Find a mission by id.
    pub fn mission_by_id(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// All scenarios in order.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Get a scenario by position.
    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// Non-fatal issues found during validation.
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }
}
