// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale identifiers and vertical (parent) inheritance.
//!
//! `sr_Cyrl_RS` inherits from `sr_Cyrl`, then `sr`, then the root locale.
//! Explicit parent overrides from the configuration take precedence over
//! subtag stripping, which is how `en_150 -> en_001` style parents work.

use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque locale identifier made of separator-joined subtags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleId(String);

impl LocaleId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self, config: &ResolverConfig) -> bool {
        self.0 == config.root_locale
    }

    /// The locale this one inherits from, or `None` for the root.
    pub fn parent(&self, config: &ResolverConfig) -> Option<LocaleId> {
        if self.is_root(config) {
            return None;
        }
        if let Some(parent) = config.parent_overrides.get(&self.0) {
            return Some(LocaleId::new(parent));
        }
        match self.0.rfind(config.separator) {
            Some(pos) if pos > 0 => Some(LocaleId::new(&self.0[..pos])),
            _ => Some(LocaleId::new(&config.root_locale)),
        }
    }

    /// `[self, parent, ..., root]`.
    pub fn vertical_chain(&self, config: &ResolverConfig) -> Result<Vec<LocaleId>, ResolutionError> {
        let mut chain = vec![self.clone()];
        let mut current = self.clone();
        while let Some(parent) = current.parent(config) {
            if chain.contains(&parent) {
                return Err(ResolutionError::CyclicParent {
                    locale: self.0.clone(),
                    chain: chain.iter().map(|l| l.0.clone()).collect(),
                });
            }
            chain.push(parent.clone());
            current = parent;
        }
        Ok(chain)
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleId {
    fn from(id: &str) -> Self {
        LocaleId::new(id)
    }
}
