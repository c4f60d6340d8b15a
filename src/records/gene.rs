// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::Value;

use super::{FromPayload, RecordPayload, RecordStatus};
use crate::types::AccessionId;

/// A gene record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneRecord {
    id: AccessionId,
    status: RecordStatus,
    document: Option<Value>,
}

impl GeneRecord {
    pub fn id(&self) -> &AccessionId {
        &self.id
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn is_found(&self) -> bool {
        self.status.is_found()
    }

    /// The decoded document, present only for found records
    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    /// Looks up a field by JSON pointer, e.g. `/summary`
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.document.as_ref()?.pointer(pointer)
    }

    /// String field by JSON pointer
    pub fn text(&self, pointer: &str) -> Option<&str> {
        self.field(pointer)?.as_str()
    }
}

impl FromPayload for GeneRecord {
    type Payload = Value;

    const KIND: &'static str = "gene";

    fn from_payload(id: AccessionId, payload: RecordPayload<Value>) -> Self {
        Self {
            id,
            status: payload.status(),
            document: payload.decoded(),
        }
    }
}
