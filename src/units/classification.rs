//! Classification Grouper
//!
//! Collapses individual soil classification codes into coarser groups so
//! that, for example, SW/SP/SM/SC layers of the same origin form one unit.
//!
//! The lookup table is an immutable value handed to the grouper. The default
//! table covers the clay, sand, gravel and silt families; alternative
//! taxonomies can be loaded from JSON (`{"Group": ["CODE", ...], ...}`).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

/// Label used for missing codes (and missing origins in GroupKeys)
pub const UNKNOWN: &str = "Unknown";

/// Default code families: group label → member codes
const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("CL_Group", &["CL", "CL-CI"]),
    ("CI_Group", &["CI", "CI-CH"]),
    ("CH_Group", &["CH"]),
    ("Gravel_Group", &["GW", "GP", "GM", "GC"]),
    ("Sand_Group", &["SW", "SP", "SM", "SC"]),
    ("Silt_Group", &["ML", "MH"]),
];

/// Coarse classification label derived from a layer's code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassificationGroup(String);

impl ClassificationGroup {
    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }
}

impl fmt::Display for ClassificationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps classification codes to groups using an injected lookup table
#[derive(Debug, Clone)]
pub struct ClassificationGrouper {
    /// code → group label
    lookup: FxHashMap<String, String>,
}

impl Default for ClassificationGrouper {
    fn default() -> Self {
        let lookup = DEFAULT_GROUPS
            .iter()
            .flat_map(|(group, codes)| codes.iter().map(move |code| (code.to_string(), group.to_string())))
            .collect();
        Self { lookup }
    }
}

impl ClassificationGrouper {
    /// Build from (group label, member codes) pairs
    ///
    /// A code listed under two different groups is rejected.
    pub fn from_groups<I>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut lookup = FxHashMap::default();

        for (group, codes) in groups {
            for code in codes {
                let code = code.trim().to_string();
                if let Some(existing) = lookup.insert(code.clone(), group.clone()) {
                    if existing != group {
                        anyhow::bail!(
                            "Code '{}' assigned to both '{}' and '{}'",
                            code, existing, group
                        );
                    }
                }
            }
        }

        Ok(Self { lookup })
    }

    /// Load a grouping table from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read classification table: {:?}", path))?;

        let groups: BTreeMap<String, Vec<String>> = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse classification table JSON")?;

        Self::from_groups(groups)
    }

    /// Group a raw classification code
    ///
    /// - `None` → `Unknown`
    /// - Surrounding whitespace is ignored; matching is exact and case-sensitive
    /// - Codes outside the table (including blank ones) form their own group
    pub fn group(&self, code: Option<&str>) -> ClassificationGroup {
        let Some(code) = code.map(str::trim) else {
            return ClassificationGroup::unknown();
        };

        match self.lookup.get(code) {
            Some(group) => ClassificationGroup(group.clone()),
            None => ClassificationGroup(code.to_string()),
        }
    }
}
