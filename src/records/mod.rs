// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Domain records built from fetch outcomes
//!
//! Every lookup produces a record, even when nothing could be fetched. Callers
//! inspect [`RecordStatus`] rather than handling errors:
//!
//! - [`RecordStatus::Found`]: built from a decoded payload
//! - [`RecordStatus::Empty`]: the identifier was invalid and the service was not queried
//! - [`RecordStatus::NotFound`]: the retry budget ran out

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::AccessionId;

mod gene;
mod nucleotide;
mod protein;

pub use gene::GeneRecord;
pub use nucleotide::NucleotideRecord;
pub use protein::ProteinRecord;

/// How a record came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Found,
    Empty,
    NotFound,
}

impl RecordStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Found => "found",
            Self::Empty => "empty",
            Self::NotFound => "not found",
        };
        f.write_str(label)
    }
}

/// Input to a record constructor
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPayload<T> {
    /// A decoded response
    Decoded(T),
    /// Placeholder for an invalid identifier
    Empty,
    /// The identifier could not be fetched
    NotFound,
}

impl<T> RecordPayload<T> {
    pub fn status(&self) -> RecordStatus {
        match self {
            Self::Decoded(_) => RecordStatus::Found,
            Self::Empty => RecordStatus::Empty,
            Self::NotFound => RecordStatus::NotFound,
        }
    }

    pub fn decoded(self) -> Option<T> {
        match self {
            Self::Decoded(payload) => Some(payload),
            Self::Empty | Self::NotFound => None,
        }
    }
}

/// Constructs a record of one kind from a fetch outcome
pub trait FromPayload: Sized + Send + Sync + 'static {
    /// Decoded form this record is built from
    type Payload;

    /// Short name used in log lines and spans
    const KIND: &'static str;

    fn from_payload(id: AccessionId, payload: RecordPayload<Self::Payload>) -> Self;
}
