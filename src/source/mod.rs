// SPDX-License-Identifier: PMPL-1.0-or-later

//! Collaborators the resolver reads from.
//!
//! The resolver never loads data itself. Callers hand it a [`RawValueStore`]
//! (unresolved per-locale values) and a [`SchemaInfo`] (attribute optionality)
//! for one data snapshot. Both must be safe for concurrent reads if the
//! resolver is shared across threads.

mod snapshot;

pub use snapshot::Snapshot;

use crate::locale::LocaleId;
use crate::xpath::XPath;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Unresolved per-locale value lookup.
pub trait RawValueStore {
    /// The value stored directly in `locale` at exactly `path`.
    ///
    /// May return the inheritance marker; the resolver interprets it.
    fn raw_value(&self, locale: &LocaleId, path: &XPath) -> Result<Option<String>>;

    /// Every path with a raw value in `locale`, in the store's iteration order.
    fn paths(&self, locale: &LocaleId) -> Result<Vec<XPath>>;
}

/// Schema introspection for attribute optionality.
pub trait SchemaInfo {
    fn is_optional(&self, element: &str, attribute: &str) -> Result<bool>;
}

impl<T: RawValueStore + ?Sized> RawValueStore for &T {
    fn raw_value(&self, locale: &LocaleId, path: &XPath) -> Result<Option<String>> {
        (**self).raw_value(locale, path)
    }

    fn paths(&self, locale: &LocaleId) -> Result<Vec<XPath>> {
        (**self).paths(locale)
    }
}

impl<T: SchemaInfo + ?Sized> SchemaInfo for &T {
    fn is_optional(&self, element: &str, attribute: &str) -> Result<bool> {
        (**self).is_optional(element, attribute)
    }
}

/// What a single `(locale, path)` probe found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RawValue {
    /// A present value that is not the inheritance marker.
    Hard(String),
    /// The inheritance marker: present, but defers to inheritance.
    Marker,
    Absent,
}

impl RawValue {
    pub fn classify(raw: Option<String>, marker: &str) -> Self {
        match raw {
            Some(value) if value == marker => RawValue::Marker,
            Some(value) => RawValue::Hard(value),
            None => RawValue::Absent,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, RawValue::Hard(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_distinguishes_marker_from_absence() {
        assert_eq!(RawValue::classify(None, "↑↑↑"), RawValue::Absent);
        assert_eq!(
            RawValue::classify(Some("↑↑↑".to_string()), "↑↑↑"),
            RawValue::Marker
        );
        assert_eq!(
            RawValue::classify(Some("euro".to_string()), "↑↑↑"),
            RawValue::Hard("euro".to_string())
        );
        assert!(!RawValue::Marker.is_hard());
    }
}
