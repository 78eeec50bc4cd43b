// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fatal resolution errors.
//!
//! Absence of a value is never an error: resolvers return `Ok(None)`. Every
//! variant here means the snapshot itself is inconsistent and the enclosing
//! batch should stop.

use crate::xpath::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Alias expansion revisited a path it had already produced.
    #[error("cyclic alias starting at {start}: {}", .chain.join(" -> "))]
    CyclicAlias { start: String, chain: Vec<String> },

    /// A governed attribute is carried by more than one element of a path.
    #[error("attribute '{attribute}' occurs on more than one element of {path}")]
    DuplicateGovernedAttribute { attribute: String, path: String },

    /// An alias declaration in the root data cannot be turned into a rewrite.
    #[error("malformed alias declaration {declaration}: {reason}")]
    MalformedAlias { declaration: String, reason: String },

    /// Parent overrides loop back on themselves.
    #[error("cyclic locale parents from {locale}: {}", .chain.join(" -> "))]
    CyclicParent { locale: String, chain: Vec<String> },

    #[error(transparent)]
    Path(#[from] PathError),

    /// Failure reported by a value store or schema collaborator, unchanged.
    #[error("collaborator failure: {0}")]
    Collaborator(#[source] anyhow::Error),
}

impl ResolutionError {
    pub fn collaborator(error: anyhow::Error) -> Self {
        ResolutionError::Collaborator(error)
    }

    /// True for errors that point at corrupt source data rather than a bad
    /// query or a collaborator outage.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            ResolutionError::CyclicAlias { .. }
                | ResolutionError::DuplicateGovernedAttribute { .. }
                | ResolutionError::MalformedAlias { .. }
                | ResolutionError::CyclicParent { .. }
        )
    }
}
