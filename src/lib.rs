// SPDX-License-Identifier: PMPL-1.0-or-later

//! ldml-bailey — Locale Value Inheritance Resolution.
//!
//! Answers "what value does this locale actually show for this field, and
//! where did it come from" for LDML-style locale data.
//!
//! RESOLUTION DIMENSIONS:
//! 1. **Vertical**: a locale falls back to its parent, up to the root locale
//!    (`sr_Cyrl_RS -> sr_Cyrl -> sr -> root`).
//! 2. **Lateral**: a path falls back through root-declared subtree aliases
//!    and through generalization of `alt`, `case`, `gender` and `count`.
//!
//! The crate does no I/O. Callers provide a [`RawValueStore`] and
//! [`SchemaInfo`] for one data snapshot, build an [`AliasTable`] from its
//! root once, and query through a [`Resolver`].
//!
//! ```
//! use ldml_bailey::{AliasTable, LocaleId, Resolver, ResolverConfig, Snapshot, XPath};
//!
//! let mut snapshot = Snapshot::new();
//! let other = XPath::parse(r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="other"]"#).unwrap();
//! snapshot.insert("fr", other.clone(), "{0} mètres");
//!
//! let config = ResolverConfig::default();
//! let aliases = AliasTable::from_store(&snapshot, &config).unwrap();
//! let resolver = Resolver::new(&snapshot, &snapshot, &aliases, &config);
//!
//! let few = XPath::parse(r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="few"]"#).unwrap();
//! let hit = resolver
//!     .resolve_with_own_value_first(&LocaleId::new("fr_CA"), &few)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(hit.value, "{0} mètres");
//! assert_eq!(hit.origin_path, other);
//! assert_eq!(hit.origin_locale.as_str(), "fr");
//! ```

pub mod alias;
pub mod config;
pub mod error;
pub mod lateral;
pub mod locale;
pub mod resolver;
pub mod source;
pub mod xpath;

pub use alias::{AliasDeclaration, AliasTable};
pub use config::ResolverConfig;
pub use error::ResolutionError;
pub use lateral::{AttributePolicy, GovernedAttribute, GOVERNED_ATTRIBUTES};
pub use locale::LocaleId;
pub use resolver::{InheritanceTrace, Probe, ResolvedValue, Resolver, SearchMode};
pub use source::{RawValue, RawValueStore, SchemaInfo, Snapshot};
pub use xpath::{Element, PathError, XPath};
