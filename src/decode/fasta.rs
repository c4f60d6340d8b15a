//! FASTA decoding for nucleotide fetches

use serde::{Deserialize, Serialize};

use super::PayloadDecoder;
use crate::errors::DecodeError;
use crate::transport::RawResponse;

/// One FASTA entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastaRecord {
    /// Header line without the leading `>`
    pub header: String,
    /// Residues with line breaks removed
    pub sequence: String,
}

impl FastaRecord {
    /// First whitespace-delimited token of the header
    pub fn accession(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    /// Header text after the accession
    pub fn description(&self) -> &str {
        self.header
            .trim_start()
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim())
            .unwrap_or("")
    }
}

/// Decodes FASTA text into records
///
/// A body that does not start with `>` is not FASTA (the service answers some errors
/// with plain text). An entry with a header but no residues means the transfer was
/// cut short.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastaDecoder;

impl PayloadDecoder for FastaDecoder {
    type Output = Vec<FastaRecord>;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let body = raw.body().trim();
        if body.is_empty() {
            return Err(DecodeError::incomplete("empty response body"));
        }
        if !body.starts_with('>') {
            let preview: String = body.chars().take(60).collect();
            return Err(DecodeError::not_structured(format!(
                "expected FASTA, got '{preview}'"
            )));
        }

        let mut records = Vec::new();
        let mut current: Option<FastaRecord> = None;

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(header) = line.strip_prefix('>') {
                if let Some(record) = current.take() {
                    records.push(finish(record)?);
                }
                current = Some(FastaRecord {
                    header: header.trim().to_string(),
                    sequence: String::new(),
                });
                continue;
            }
            if let Some(bad) = line.chars().find(|c| !is_residue(*c)) {
                return Err(DecodeError::corrupted(format!(
                    "unexpected character '{bad}' in sequence data"
                )));
            }
            if let Some(record) = current.as_mut() {
                record.sequence.push_str(line);
            }
        }

        if let Some(record) = current {
            records.push(finish(record)?);
        }
        Ok(records)
    }
}

fn finish(record: FastaRecord) -> Result<FastaRecord, DecodeError> {
    if record.sequence.is_empty() {
        return Err(DecodeError::incomplete(format!(
            "no sequence data for '{}'",
            record.header
        )));
    }
    Ok(record)
}

fn is_residue(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '*' || c == '-'
}
