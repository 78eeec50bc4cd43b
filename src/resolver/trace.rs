// SPDX-License-Identifier: PMPL-1.0-or-later

//! Probe-by-probe record of a lookup, for tooling that shows "what was tried".

use super::{ResolvedValue, SearchMode};
use crate::locale::LocaleId;
use crate::source::RawValue;
use crate::xpath::XPath;
use serde::{Deserialize, Serialize};

/// One `(path, locale)` query against the value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub path: XPath,
    pub locale: LocaleId,
    pub outcome: RawValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceTrace {
    pub locale: LocaleId,
    pub path: XPath,
    pub mode: SearchMode,
    /// Probes in the order they were made; the last one is the hit, if any.
    pub probes: Vec<Probe>,
    pub result: Option<ResolvedValue>,
}

impl InheritanceTrace {
    /// Probes that found an explicit inheritance marker rather than nothing.
    pub fn marker_probes(&self) -> impl Iterator<Item = &Probe> {
        self.probes
            .iter()
            .filter(|probe| probe.outcome == RawValue::Marker)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
