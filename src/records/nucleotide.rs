// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use super::{FromPayload, RecordPayload, RecordStatus};
use crate::decode::FastaRecord;
use crate::types::{AccessionId, SequenceWindow, Strand};

/// A nucleotide sequence, possibly restricted to a window and strand
///
/// The service answers with one FASTA entry per request; only the first entry is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NucleotideRecord {
    id: AccessionId,
    status: RecordStatus,
    window: Option<SequenceWindow>,
    strand: Option<Strand>,
    fasta: Option<FastaRecord>,
}

impl NucleotideRecord {
    /// Records the window and strand the sequence was requested with
    pub fn with_region(mut self, window: Option<SequenceWindow>, strand: Option<Strand>) -> Self {
        self.window = window;
        self.strand = strand;
        self
    }

    pub fn id(&self) -> &AccessionId {
        &self.id
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn is_found(&self) -> bool {
        self.status.is_found()
    }

    pub fn window(&self) -> Option<SequenceWindow> {
        self.window
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    pub fn header(&self) -> Option<&str> {
        self.fasta.as_ref().map(|f| f.header.as_str())
    }

    pub fn sequence(&self) -> Option<&str> {
        self.fasta.as_ref().map(|f| f.sequence.as_str())
    }

    /// Number of residues, 0 when no sequence is present
    pub fn len(&self) -> usize {
        self.sequence().map_or(0, str::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromPayload for NucleotideRecord {
    type Payload = Vec<FastaRecord>;

    const KIND: &'static str = "nucleotide";

    fn from_payload(id: AccessionId, payload: RecordPayload<Vec<FastaRecord>>) -> Self {
        Self {
            id,
            status: payload.status(),
            window: None,
            strand: None,
            fasta: payload.decoded().and_then(|entries| entries.into_iter().next()),
        }
    }
}
