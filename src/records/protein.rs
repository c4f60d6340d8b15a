// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::Value;

use super::{FromPayload, RecordPayload, RecordStatus};
use crate::types::AccessionId;

/// A protein record, fetched alone or as part of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinRecord {
    id: AccessionId,
    status: RecordStatus,
    document: Option<Value>,
}

impl ProteinRecord {
    pub fn id(&self) -> &AccessionId {
        &self.id
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn is_found(&self) -> bool {
        self.status.is_found()
    }

    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    /// Looks up a field by JSON pointer
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.document.as_ref()?.pointer(pointer)
    }

    /// String field by JSON pointer, e.g. `/GBSeq_definition` for XML records
    pub fn text(&self, pointer: &str) -> Option<&str> {
        self.field(pointer)?.as_str()
    }
}

impl FromPayload for ProteinRecord {
    type Payload = Value;

    const KIND: &'static str = "protein";

    fn from_payload(id: AccessionId, payload: RecordPayload<Value>) -> Self {
        Self {
            id,
            status: payload.status(),
            document: payload.decoded(),
        }
    }
}
