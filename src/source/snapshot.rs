// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory snapshot implementing both collaborator traits.
//!
//! Useful for fixtures and for callers that have already flattened their
//! locale data into `path -> value` maps. Documents look like:
//!
//! ```yaml
//! locales:
//!   root:
//!     '//ldml/units/unit[@type="meter"]/unitPattern[@count="other"]': "{0} m"
//!   fr:
//!     '//ldml/units/unit[@type="meter"]/unitPattern[@count="one"]': "{0} mètre"
//! optional_attributes:
//!   unitPattern: [case, gender]
//! ```

use super::{RawValueStore, SchemaInfo};
use crate::locale::LocaleId;
use crate::xpath::XPath;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    locales: BTreeMap<LocaleId, IndexMap<XPath, String>>,
    /// element name -> attributes the schema marks optional
    #[serde(default)]
    optional_attributes: BTreeMap<String, BTreeSet<String>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("parsing json snapshot")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("parsing yaml snapshot")
    }

    /// Store a raw value, replacing any previous one at the same path.
    pub fn insert(&mut self, locale: &str, path: XPath, value: &str) {
        self.locales
            .entry(LocaleId::new(locale))
            .or_default()
            .insert(path, value.to_string());
    }

    pub fn mark_optional(&mut self, element: &str, attribute: &str) {
        self.optional_attributes
            .entry(element.to_string())
            .or_default()
            .insert(attribute.to_string());
    }

    pub fn locales(&self) -> impl Iterator<Item = &LocaleId> {
        self.locales.keys()
    }

    pub fn value_count(&self) -> usize {
        self.locales.values().map(IndexMap::len).sum()
    }
}

impl RawValueStore for Snapshot {
    fn raw_value(&self, locale: &LocaleId, path: &XPath) -> Result<Option<String>> {
        Ok(self
            .locales
            .get(locale)
            .and_then(|values| values.get(path))
            .cloned())
    }

    fn paths(&self, locale: &LocaleId) -> Result<Vec<XPath>> {
        Ok(self
            .locales
            .get(locale)
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default())
    }
}

impl SchemaInfo for Snapshot {
    fn is_optional(&self, element: &str, attribute: &str) -> Result<bool> {
        Ok(self
            .optional_attributes
            .get(element)
            .map(|attributes| attributes.contains(attribute))
            .unwrap_or(false))
    }
}
