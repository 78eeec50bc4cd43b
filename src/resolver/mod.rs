// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bailey value resolution.
//!
//! A lookup combines two fallback dimensions:
//!
//! - **vertical**: the locale, then its parent, up to the root locale;
//! - **lateral**: the path, its alias rewrites, then cumulatively
//!   generalized attribute variants, each followed by its own rewrites.
//!
//! Candidates are tried path-major: every locale of the vertical chain is
//! probed for one candidate path before the next candidate is considered.
//! The first hard value wins and is reported with the path and locale it was
//! found at.

mod trace;

pub use trace::{InheritanceTrace, Probe};

use crate::alias::AliasTable;
use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use crate::lateral::generate_variants;
use crate::locale::LocaleId;
use crate::source::{RawValue, RawValueStore, SchemaInfo};
use crate::xpath::XPath;
use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A resolved value with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub value: String,
    pub origin_path: XPath,
    pub origin_locale: LocaleId,
}

/// Which lookup a search performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// The locale's own value at the exact path counts.
    OwnValueFirst,
    /// Only what the locale would inherit: its own value at the exact path
    /// is skipped.
    BaileyOnly,
}

/// Read-only resolver over one data snapshot.
///
/// Holds only shared references, so it is cheap to copy and can be used from
/// many threads at once when the collaborators are `Sync`.
pub struct Resolver<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    schema: &'a C,
    aliases: &'a AliasTable,
    config: &'a ResolverConfig,
}

impl<S: ?Sized, C: ?Sized> Clone for Resolver<'_, S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized, C: ?Sized> Copy for Resolver<'_, S, C> {}

impl<'a, S, C> Resolver<'a, S, C>
where
    S: RawValueStore + ?Sized,
    C: SchemaInfo + ?Sized,
{
    pub fn new(
        store: &'a S,
        schema: &'a C,
        aliases: &'a AliasTable,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            store,
            schema,
            aliases,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    pub fn aliases(&self) -> &AliasTable {
        self.aliases
    }

    /// The locale's effective value for `path`, own value included.
    pub fn resolve_with_own_value_first(
        &self,
        locale: &LocaleId,
        path: &XPath,
    ) -> Result<Option<ResolvedValue>, ResolutionError> {
        self.search(locale, path, SearchMode::OwnValueFirst, &mut |_| {})
    }

    /// The value `locale` would inherit for `path` if it had no value of its
    /// own there.
    pub fn resolve_bailey_only(
        &self,
        locale: &LocaleId,
        path: &XPath,
    ) -> Result<Option<ResolvedValue>, ResolutionError> {
        self.search(locale, path, SearchMode::BaileyOnly, &mut |_| {})
    }

    /// Ordered, deduplicated candidate paths tried for `path`.
    ///
    /// The chain does not depend on the locale: the same candidates are
    /// probed against whichever vertical chain the lookup uses.
    pub fn inheritance_chain(&self, path: &XPath) -> Result<Vec<XPath>, ResolutionError> {
        Ok(self.build_inheritance_chain(path)?.into_iter().collect())
    }

    /// Run a lookup and record every probe it made.
    pub fn explain(
        &self,
        locale: &LocaleId,
        path: &XPath,
        mode: SearchMode,
    ) -> Result<InheritanceTrace, ResolutionError> {
        let mut probes = Vec::new();
        let result = self.search(locale, path, mode, &mut |probe| probes.push(probe))?;
        Ok(InheritanceTrace {
            locale: locale.clone(),
            path: path.clone(),
            mode,
            probes,
            result,
        })
    }

    /// Resolve many paths in parallel, results in input order.
    ///
    /// The first fatal error aborts the whole batch.
    pub fn resolve_batch(
        &self,
        locale: &LocaleId,
        paths: &[XPath],
        mode: SearchMode,
    ) -> Result<Vec<Option<ResolvedValue>>, ResolutionError>
    where
        S: Sync,
        C: Sync,
    {
        paths
            .par_iter()
            .map(|path| self.search(locale, path, mode, &mut |_| {}))
            .collect()
    }

    fn build_inheritance_chain(&self, path: &XPath) -> Result<IndexSet<XPath>, ResolutionError> {
        let mut chain = IndexSet::new();
        self.aliases.expand_into(path, &mut chain)?;
        for variant in generate_variants(path, self.schema, &self.config.default_count)? {
            self.aliases.expand_into(&variant, &mut chain)?;
        }
        Ok(chain)
    }

    fn search(
        &self,
        locale: &LocaleId,
        path: &XPath,
        mode: SearchMode,
        observe: &mut dyn FnMut(Probe),
    ) -> Result<Option<ResolvedValue>, ResolutionError> {
        let vertical = locale.vertical_chain(self.config)?;

        let own_chain = match mode {
            SearchMode::OwnValueFirst => &vertical[..],
            SearchMode::BaileyOnly => &vertical[1..],
        };
        if let Some(hit) = self.vertical_search(path, own_chain, observe)? {
            return Ok(Some(hit));
        }

        for candidate in self.build_inheritance_chain(path)? {
            if &candidate == path {
                continue;
            }
            if let Some(hit) = self.vertical_search(&candidate, &vertical, observe)? {
                return Ok(Some(hit));
            }
        }

        tracing::trace!(locale = %locale, path = %path, "no value in any fallback");
        Ok(None)
    }

    fn vertical_search(
        &self,
        path: &XPath,
        locales: &[LocaleId],
        observe: &mut dyn FnMut(Probe),
    ) -> Result<Option<ResolvedValue>, ResolutionError> {
        for locale in locales {
            let raw = self
                .store
                .raw_value(locale, path)
                .map_err(ResolutionError::collaborator)?;
            let outcome = RawValue::classify(raw, &self.config.inheritance_marker);
            tracing::trace!(locale = %locale, path = %path, outcome = ?outcome, "probe");

            let hit = match &outcome {
                RawValue::Hard(value) => Some(value.clone()),
                RawValue::Marker | RawValue::Absent => None,
            };
            observe(Probe {
                path: path.clone(),
                locale: locale.clone(),
                outcome,
            });

            if let Some(value) = hit {
                tracing::debug!(locale = %locale, origin = %path, "resolved");
                return Ok(Some(ResolvedValue {
                    value,
                    origin_path: path.clone(),
                    origin_locale: locale.clone(),
                }));
            }
        }
        Ok(None)
    }
}
