// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Accession identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// An accession identifier for a record in the remote database
///
/// Identifiers are opaque strings (`NP_005566`, `7157`, `NM_000546.6`). Surrounding
/// whitespace is trimmed on construction. An identifier that is empty or contains
/// whitespace or commas can never match a record (commas would also split a batch
/// request), so it is treated as the invalid identifier and is never sent to the
/// remote service.
///
/// # Examples
///
/// ```rust
/// use seqcache::AccessionId;
///
/// let id = AccessionId::new(" NP_005566 ");
/// assert_eq!(id.as_str(), "NP_005566");
/// assert!(!id.is_invalid());
///
/// assert!(AccessionId::new("").is_invalid());
/// assert!(AccessionId::new("NP_1,NP_2").is_invalid());
/// assert!(AccessionId::invalid().is_invalid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessionId(String);

impl AccessionId {
    /// Creates an identifier, trimming surrounding whitespace
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The reserved invalid identifier
    pub fn invalid() -> Self {
        Self(String::new())
    }

    /// Returns `true` if this identifier cannot refer to any record
    pub fn is_invalid(&self) -> bool {
        self.0.is_empty() || self.0.chars().any(|c| c == ',' || c.is_whitespace())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins identifiers the way the remote service expects them in one request
    pub fn join(ids: &[AccessionId]) -> String {
        ids.iter()
            .map(AccessionId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for AccessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<invalid>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for AccessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccessionId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&AccessionId> for AccessionId {
    fn from(id: &AccessionId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for AccessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
