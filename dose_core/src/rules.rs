//! Rule file loading.
//!
//! A rules directory holds up to three YAML documents:
//! - `constraints.yaml`: a top-level `constraints` sequence of scheduling rules
//! - `tags.yaml`: medication tag metadata, passed through untouched
//! - `sources.yaml`: drug-metadata source configuration, passed through untouched
//!
//! A missing file is a normal cold-start state and yields an empty result
//! with a warning. A file that exists but does not parse is an operator error
//! and is returned as `Err`.

use crate::duration::parse_duration;
use crate::{Constraint, ConstraintKind, Error, Result};
use chrono::Duration;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Untyped key-value document loaded from a rule file
pub type RuleMap = BTreeMap<String, serde_yaml::Value>;

pub const CONSTRAINTS_FILE: &str = "constraints.yaml";
pub const TAGS_FILE: &str = "tags.yaml";
pub const SOURCES_FILE: &str = "sources.yaml";

/// Constraint file format
#[derive(Debug, Default, Deserialize)]
struct ConstraintsFile {
    #[serde(default)]
    constraints: Vec<ConstraintEntry>,
}

/// One entry of the `constraints` sequence
#[derive(Debug, Deserialize)]
struct ConstraintEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    drug_a: Option<String>,
    drug_b: Option<String>,
    min_gap: Option<GapValue>,
    description: Option<String>,
}

/// `min_gap` may be written as `"4h"` or as a bare number of hours
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GapValue {
    Hours(i64),
    Text(String),
}

impl GapValue {
    fn parse(&self) -> Result<Option<Duration>> {
        match self {
            GapValue::Hours(h) => parse_duration(&h.to_string()),
            GapValue::Text(s) => parse_duration(s),
        }
    }
}

impl TryFrom<ConstraintEntry> for Constraint {
    type Error = Error;

    fn try_from(entry: ConstraintEntry) -> Result<Self> {
        let min_gap = match &entry.min_gap {
            Some(gap) => gap.parse()?,
            None => None,
        };

        Ok(Constraint {
            kind: ConstraintKind::parse(entry.kind.as_deref().unwrap_or("unknown")),
            drug_a: entry.drug_a.unwrap_or_default(),
            drug_b: entry.drug_b,
            min_gap,
            description: entry.description.unwrap_or_default(),
        })
    }
}

/// Loads scheduling rules from a directory of YAML files
///
/// Every call performs a fresh read; nothing is cached.
#[derive(Clone, Debug)]
pub struct RuleLoader {
    rules_dir: PathBuf,
}

impl RuleLoader {
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
        }
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Load all constraints from `constraints.yaml`
    pub fn load_constraints(&self) -> Result<Vec<Constraint>> {
        let path = self.rules_dir.join(CONSTRAINTS_FILE);
        let Some(contents) = read_optional(&path)? else {
            return Ok(Vec::new());
        };

        let file: Option<ConstraintsFile> = serde_yaml::from_str(&contents)?;
        let constraints = file
            .unwrap_or_default()
            .constraints
            .into_iter()
            .map(Constraint::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded {} constraints from {:?}", constraints.len(), path);
        Ok(constraints)
    }

    /// Load medication tags from `tags.yaml`
    pub fn load_tags(&self) -> Result<RuleMap> {
        self.load_map(TAGS_FILE)
    }

    /// Load drug-metadata source configuration from `sources.yaml`
    pub fn load_sources(&self) -> Result<RuleMap> {
        self.load_map(SOURCES_FILE)
    }

    fn load_map(&self, file_name: &str) -> Result<RuleMap> {
        let path = self.rules_dir.join(file_name);
        let Some(contents) = read_optional(&path)? else {
            return Ok(RuleMap::new());
        };

        let map: Option<RuleMap> = serde_yaml::from_str(&contents)?;
        let map = map.unwrap_or_default();
        tracing::debug!("Loaded {} keys from {:?}", map.len(), path);
        Ok(map)
    }
}

/// Read a rule file, returning `None` if it does not exist or is blank
fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        tracing::warn!("Rule file {:?} not found, treating as empty", path);
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        tracing::debug!("Rule file {:?} is empty", path);
        return Ok(None);
    }
    Ok(Some(contents))
}
