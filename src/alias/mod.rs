// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lateral subtree aliases.
//!
//! Root data declares aliases as paths ending in an `alias` element, e.g.
//!
//! ```text
//! //ldml/dates/calendars/calendar[@type="buddhist"]/eras/alias[@source="locale"][@path="../../calendar[@type='gregorian']/eras"]
//! ```
//!
//! which rewrites every path under the buddhist `eras` prefix to the same
//! suffix under the gregorian one. The table is built once per snapshot and
//! is immutable afterwards, so it can be shared by any number of resolvers.

use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use crate::locale::LocaleId;
use crate::source::RawValueStore;
use crate::xpath::{resolve_relative, XPath};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

pub const ALIAS_ELEMENT: &str = "alias";
const SAME_LOCALE_SOURCE: &str = "locale";

/// One prefix rewrite taken from an alias declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasDeclaration {
    pub prefix: XPath,
    pub replacement: XPath,
}

impl AliasDeclaration {
    /// Interpret a root path as an alias declaration.
    ///
    /// Returns `Ok(None)` for paths without an `alias` element and for
    /// aliases that point into another locale, which lateral inheritance
    /// does not follow.
    pub fn parse(path: &XPath) -> Result<Option<Self>, ResolutionError> {
        let Some(index) = path.element_index(ALIAS_ELEMENT) else {
            return Ok(None);
        };
        if index == 0 {
            return Err(malformed(path, "alias element has no owning prefix"));
        }

        let source = path.attribute(index, "source");
        if let Some(source) = source.filter(|source| *source != SAME_LOCALE_SOURCE) {
            tracing::warn!(
                declaration = %path,
                source,
                "skipping alias into another locale"
            );
            return Ok(None);
        }

        let prefix = path.truncated(index);
        let replacement = match path.attribute(index, "path") {
            Some(relative) => resolve_relative(&prefix, relative)?,
            None => prefix.clone(),
        };
        if replacement.as_str().starts_with(prefix.as_str()) {
            return Err(malformed(
                path,
                "alias must point outside the subtree it declares",
            ));
        }

        Ok(Some(Self {
            prefix,
            replacement,
        }))
    }
}

fn malformed(path: &XPath, reason: &str) -> ResolutionError {
    ResolutionError::MalformedAlias {
        declaration: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Prefix-rewrite table, longest prefix first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AliasTable {
    entries: Vec<AliasDeclaration>,
}

impl AliasTable {
    /// Build from the root locale's paths. Non-alias paths are ignored; when
    /// two declarations share a prefix the later one wins.
    pub fn build<'a, I>(root_paths: I) -> Result<Self, ResolutionError>
    where
        I: IntoIterator<Item = &'a XPath>,
    {
        let mut declarations = Vec::new();
        for path in root_paths {
            if let Some(declaration) = AliasDeclaration::parse(path)? {
                declarations.push(declaration);
            }
        }
        Ok(Self::from_declarations(declarations))
    }

    /// Build from the root locale of a value store.
    pub fn from_store<S>(store: &S, config: &ResolverConfig) -> Result<Self, ResolutionError>
    where
        S: RawValueStore + ?Sized,
    {
        let root = LocaleId::new(&config.root_locale);
        let paths = store
            .paths(&root)
            .map_err(ResolutionError::collaborator)?;
        Self::build(paths.iter())
    }

    /// Build directly from rewrites, later entries overwriting earlier ones
    /// with the same prefix.
    pub fn from_declarations<I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = AliasDeclaration>,
    {
        let mut by_prefix: IndexMap<XPath, XPath> = IndexMap::new();
        for declaration in declarations {
            by_prefix.insert(declaration.prefix, declaration.replacement);
        }

        let mut entries: Vec<AliasDeclaration> = by_prefix
            .into_iter()
            .map(|(prefix, replacement)| AliasDeclaration {
                prefix,
                replacement,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.prefix
                .as_str()
                .len()
                .cmp(&a.prefix.as_str().len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });

        tracing::debug!(entries = entries.len(), "built alias table");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &AliasDeclaration> {
        self.entries.iter()
    }

    /// Rewrite `path` with the longest matching prefix, if any.
    pub fn lookup_one_step(&self, path: &XPath) -> Result<Option<XPath>, ResolutionError> {
        Ok(self.rewrite(path)?.map(|(_, rewritten)| rewritten))
    }

    /// Index of the matching entry together with the rewritten path.
    fn rewrite(&self, path: &XPath) -> Result<Option<(usize, XPath)>, ResolutionError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(rest) = path.as_str().strip_prefix(entry.prefix.as_str()) {
                let rewritten = format!("{}{}", entry.replacement.as_str(), rest);
                return Ok(Some((index, XPath::parse(&rewritten)?)));
            }
        }
        Ok(None)
    }

    /// `path` followed by every path reachable by repeated rewriting.
    ///
    /// Revisiting a path, or applying the same entry twice, is a cycle: an
    /// entry that matches its own output would grow the path forever.
    pub fn expand_chain(&self, path: &XPath) -> Result<IndexSet<XPath>, ResolutionError> {
        let mut expansion = IndexSet::new();
        expansion.insert(path.clone());
        let mut applied = Vec::new();

        let mut current = path.clone();
        while let Some((entry, next)) = self.rewrite(&current)? {
            if applied.contains(&entry) || !expansion.insert(next.clone()) {
                let mut chain: Vec<String> = expansion.iter().map(XPath::to_string).collect();
                chain.push(next.to_string());
                return Err(ResolutionError::CyclicAlias {
                    start: path.to_string(),
                    chain,
                });
            }
            applied.push(entry);
            current = next;
        }
        Ok(expansion)
    }

    /// Append the expansion of `path` to `chain`, skipping paths already
    /// present.
    pub fn expand_into(
        &self,
        path: &XPath,
        chain: &mut IndexSet<XPath>,
    ) -> Result<(), ResolutionError> {
        chain.extend(self.expand_chain(path)?);
        Ok(())
    }

    /// Prefixes whose rewrite target is exactly `target`, sorted.
    pub fn reverse_aliases(&self, target: &XPath) -> Vec<XPath> {
        let mut prefixes: Vec<XPath> = self
            .entries
            .iter()
            .filter(|entry| &entry.replacement == target)
            .map(|entry| entry.prefix.clone())
            .collect();
        prefixes.sort();
        prefixes
    }
}
