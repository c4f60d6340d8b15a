// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Decoding raw responses into structured payloads
//!
//! Implement [`PayloadDecoder`] to support another response format. A decoder must
//! report every malformed body as a [`DecodeError`]; the retry coordinator treats
//! such a body like a failed request and spends another attempt on it.
//!
//! Provided decoders:
//!
//! - [`JsonDecoder`]: one JSON document
//! - [`JsonListDecoder`]: a list of JSON records, one per requested ID
//! - [`XmlRecordDecoder`]: `Entrezgene` or `GBSeq` elements of an XML record set
//! - [`RecordListDecoder`]: the JSON or XML list decoder chosen by [`ReturnFormat`]
//! - [`SingleRecord`]: adapts a list decoder to a lookup of exactly one record
//! - [`FastaDecoder`]: FASTA text (nucleotide sequences)
//! - [`SearchDecoder`]: term search results
//! - [`PostDecoder`]: identifier-list submission receipts

use serde_json::Value;

use crate::errors::DecodeError;
use crate::transport::RawResponse;
use crate::types::ReturnFormat;

mod fasta;
mod search;
mod xml;

pub use fasta::{FastaDecoder, FastaRecord};
pub use search::{PostDecoder, PostReceipt, SearchDecoder, SearchResult};
pub use xml::XmlRecordDecoder;

/// Converts a raw response body into a structured payload
///
/// # Example: a line-oriented decoder
///
/// ```rust
/// use seqcache::decode::PayloadDecoder;
/// use seqcache::{DecodeError, RawResponse};
///
/// struct LineDecoder;
///
/// impl PayloadDecoder for LineDecoder {
///     type Output = Vec<String>;
///
///     fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
///         if raw.is_empty() {
///             return Err(DecodeError::incomplete("empty body"));
///         }
///         Ok(raw.body().lines().map(str::to_owned).collect())
///     }
/// }
/// ```
pub trait PayloadDecoder: Send + Sync {
    /// Structured form produced on success
    type Output: Send;

    /// Decode one response body
    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError>;
}

/// Decodes a body as a single JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl PayloadDecoder for JsonDecoder {
    type Output = Value;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let document = parse_json(raw)?;
        reject_service_error(&document)?;
        Ok(document)
    }
}

/// Decodes a body as a list of JSON records
///
/// A top-level array yields its elements; any other document yields a single
/// record. The batch fetcher compares the number of records with the number of
/// requested IDs to detect partial answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonListDecoder;

impl PayloadDecoder for JsonListDecoder {
    type Output = Vec<Value>;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let document = parse_json(raw)?;
        reject_service_error(&document)?;
        match document {
            Value::Array(records) => Ok(records),
            record => Ok(vec![record]),
        }
    }
}

/// Gene or protein list decoder for the configured return format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordListDecoder {
    Json,
    Xml(XmlRecordDecoder),
}

impl RecordListDecoder {
    pub fn gene(format: ReturnFormat) -> Self {
        match format {
            ReturnFormat::Json => Self::Json,
            ReturnFormat::Xml => Self::Xml(XmlRecordDecoder::gene()),
        }
    }

    pub fn protein(format: ReturnFormat) -> Self {
        match format {
            ReturnFormat::Json => Self::Json,
            ReturnFormat::Xml => Self::Xml(XmlRecordDecoder::protein()),
        }
    }
}

impl PayloadDecoder for RecordListDecoder {
    type Output = Vec<Value>;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        match self {
            Self::Json => JsonListDecoder.decode(raw),
            Self::Xml(decoder) => decoder.decode(raw),
        }
    }
}

/// Requires a list decoder to yield exactly one record
///
/// Used for single-ID lookups so the cached document is the record itself and
/// not the list around it. Any other count is a validation failure and is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleRecord<D>(pub D);

impl<D, T> PayloadDecoder for SingleRecord<D>
where
    D: PayloadDecoder<Output = Vec<T>>,
    T: Send,
{
    type Output = T;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let mut records = self.0.decode(raw)?;
        let count = records.len();
        match records.pop() {
            Some(record) if count == 1 => Ok(record),
            _ => Err(DecodeError::validation(format!(
                "expected exactly one record, got {count}"
            ))),
        }
    }
}

fn parse_json(raw: &RawResponse) -> Result<Value, DecodeError> {
    let body = raw.body().trim_start();
    if body.is_empty() {
        return Err(DecodeError::incomplete("empty response body"));
    }
    if body.starts_with('<') {
        return Err(DecodeError::not_structured(
            "received markup where JSON was expected",
        ));
    }
    Ok(serde_json::from_str(body)?)
}

// The service reports some failures with a 200 status and an `{"error": ...}` body.
fn reject_service_error(document: &Value) -> Result<(), DecodeError> {
    match document.get("error").or_else(|| document.get("ERROR")) {
        Some(Value::String(message)) => Err(DecodeError::validation(message.clone())),
        Some(other) if !other.is_null() => Err(DecodeError::validation(other.to_string())),
        _ => Ok(()),
    }
}
