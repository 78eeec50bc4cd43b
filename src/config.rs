// SPDX-License-Identifier: PMPL-1.0-or-later

//! Resolver configuration.
//!
//! Every field has a CLDR default, so an empty document is a valid config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CLDR's reserved "inherit from parent" value.
pub const DEFAULT_INHERITANCE_MARKER: &str = "↑↑↑";
pub const DEFAULT_ROOT_LOCALE: &str = "root";
pub const DEFAULT_COUNT_CATEGORY: &str = "other";
pub const DEFAULT_SEPARATOR: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Locale that terminates every vertical chain and holds the alias data.
    pub root_locale: String,
    /// Raw value meaning "explicitly inherit here".
    pub inheritance_marker: String,
    /// Plural category that `count` falls back to before it is dropped.
    pub default_count: String,
    /// Subtag separator in locale identifiers.
    pub separator: char,
    /// Explicit parents that win over subtag stripping (CLDR `parentLocales`).
    pub parent_overrides: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_locale: DEFAULT_ROOT_LOCALE.to_string(),
            inheritance_marker: DEFAULT_INHERITANCE_MARKER.to_string(),
            default_count: DEFAULT_COUNT_CATEGORY.to_string(),
            separator: DEFAULT_SEPARATOR,
            parent_overrides: BTreeMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("parsing json resolver config")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("parsing yaml resolver config")
    }

    /// Add an explicit parent for `locale`.
    pub fn with_parent(mut self, locale: &str, parent: &str) -> Self {
        self.parent_overrides
            .insert(locale.to_string(), parent.to_string());
        self
    }
}
