// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Request descriptors for the remote query service
//!
//! Every call the gateway makes is described by a [`FetchRequest`]. The descriptor
//! carries only what is specific to the record kind; identity parameters and the
//! base URL are added by the [`RemoteService`](crate::transport::RemoteService)
//! implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AccessionId;

/// Databases the client queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Nucleotide,
    Gene,
    Protein,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Nucleotide => "nucleotide",
            Database::Gene => "gene",
            Database::Protein => "protein",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response format requested for gene and protein fetches
///
/// The public efetch endpoint serves gene and protein records as XML only;
/// `Json` is for services that answer with JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    Json,
    #[default]
    Xml,
}

impl ReturnFormat {
    /// Value of the `retmode` query parameter
    pub fn retmode(&self) -> &'static str {
        match self {
            ReturnFormat::Json => "json",
            ReturnFormat::Xml => "xml",
        }
    }
}

/// DNA strand selector for nucleotide fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Numeric code used by the remote service (1 = plus, 2 = minus)
    pub fn code(&self) -> u8 {
        match self {
            Strand::Plus => 1,
            Strand::Minus => 2,
        }
    }
}

/// Inclusive, 1-based window into a nucleotide sequence
///
/// # Examples
///
/// ```rust
/// use seqcache::SequenceWindow;
///
/// let window = SequenceWindow::new(200, 100);
/// assert_eq!((window.start(), window.end()), (100, 200));
/// assert_eq!(window.len(), 101);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceWindow {
    start: u64,
    end: u64,
}

impl SequenceWindow {
    /// Creates a window; bounds are reordered if given backwards and clamped to 1
    pub fn new(start: u64, end: u64) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        Self {
            start: start.max(1),
            end: end.max(1),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of residues covered (inclusive)
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A window always covers at least one residue
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for SequenceWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// E-utility endpoint a request is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Fetch,
    Post,
    Search,
}

impl Endpoint {
    /// Path relative to the service base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Fetch => "efetch.fcgi",
            Endpoint::Post => "epost.fcgi",
            Endpoint::Search => "esearch.fcgi",
        }
    }
}

/// One request to the remote query service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Fetch a nucleotide sequence as FASTA, optionally windowed and stranded
    Nucleotide {
        id: AccessionId,
        window: Option<SequenceWindow>,
        strand: Option<Strand>,
    },
    /// Fetch one gene record
    Gene { id: AccessionId },
    /// Fetch one or more protein records
    Protein { ids: Vec<AccessionId> },
    /// Submit an identifier list for later retrieval
    PostIds {
        database: Database,
        ids: Vec<AccessionId>,
    },
    /// Search a database by term
    Search { database: Database, term: String },
}

impl FetchRequest {
    pub fn gene(id: impl Into<AccessionId>) -> Self {
        FetchRequest::Gene { id: id.into() }
    }

    pub fn protein(ids: Vec<AccessionId>) -> Self {
        FetchRequest::Protein { ids }
    }

    pub fn nucleotide(
        id: impl Into<AccessionId>,
        window: Option<SequenceWindow>,
        strand: Option<Strand>,
    ) -> Self {
        FetchRequest::Nucleotide {
            id: id.into(),
            window,
            strand,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchRequest::Nucleotide { .. }
            | FetchRequest::Gene { .. }
            | FetchRequest::Protein { .. } => Endpoint::Fetch,
            FetchRequest::PostIds { .. } => Endpoint::Post,
            FetchRequest::Search { .. } => Endpoint::Search,
        }
    }

    pub fn database(&self) -> Database {
        match self {
            FetchRequest::Nucleotide { .. } => Database::Nucleotide,
            FetchRequest::Gene { .. } => Database::Gene,
            FetchRequest::Protein { .. } => Database::Protein,
            FetchRequest::PostIds { database, .. } | FetchRequest::Search { database, .. } => {
                *database
            }
        }
    }

    /// Identifiers carried by the request (empty for searches)
    pub fn ids(&self) -> &[AccessionId] {
        match self {
            FetchRequest::Nucleotide { id, .. } | FetchRequest::Gene { id } => {
                std::slice::from_ref(id)
            }
            FetchRequest::Protein { ids } | FetchRequest::PostIds { ids, .. } => ids,
            FetchRequest::Search { .. } => &[],
        }
    }

    /// Short human-readable description of what is being requested, for log lines
    pub fn target(&self) -> String {
        match self {
            FetchRequest::Search { term, .. } => format!("term '{term}'"),
            _ => format!("ID(s) {}", AccessionId::join(self.ids())),
        }
    }

    /// Kind-specific query parameters (identity parameters excluded)
    pub fn query_params(&self, format: ReturnFormat) -> Vec<(&'static str, String)> {
        let mut params = vec![("db", self.database().as_str().to_string())];
        match self {
            FetchRequest::Nucleotide { id, window, strand } => {
                params.push(("id", id.as_str().to_string()));
                params.push(("rettype", "fasta".to_string()));
                params.push(("retmode", "text".to_string()));
                if let Some(window) = window {
                    params.push(("seq_start", window.start().to_string()));
                    params.push(("seq_stop", window.end().to_string()));
                }
                if let Some(strand) = strand {
                    params.push(("strand", strand.code().to_string()));
                }
            }
            FetchRequest::Gene { id } => {
                params.push(("id", id.as_str().to_string()));
                params.push(("retmode", format.retmode().to_string()));
            }
            FetchRequest::Protein { ids } => {
                params.push(("id", AccessionId::join(ids)));
                // GenPept XML: one GBSeq element per requested ID
                if format == ReturnFormat::Xml {
                    params.push(("rettype", "gp".to_string()));
                }
                params.push(("retmode", format.retmode().to_string()));
            }
            FetchRequest::PostIds { ids, .. } => {
                params.push(("id", AccessionId::join(ids)));
            }
            FetchRequest::Search { term, .. } => {
                params.push(("term", term.clone()));
                params.push(("retmode", "json".to_string()));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_nucleotide_params_include_window_and_strand() {
        let request = FetchRequest::nucleotide(
            "NM_000546",
            Some(SequenceWindow::new(10, 20)),
            Some(Strand::Minus),
        );
        let params = request.query_params(ReturnFormat::Json);

        assert_eq!(request.endpoint(), Endpoint::Fetch);
        assert_eq!(param(&params, "db"), Some("nucleotide"));
        assert_eq!(param(&params, "rettype"), Some("fasta"));
        assert_eq!(param(&params, "seq_start"), Some("10"));
        assert_eq!(param(&params, "seq_stop"), Some("20"));
        assert_eq!(param(&params, "strand"), Some("2"));
    }

    #[test]
    fn test_nucleotide_params_without_window() {
        let request = FetchRequest::nucleotide("NM_000546", None, None);
        let params = request.query_params(ReturnFormat::Json);
        assert_eq!(param(&params, "seq_start"), None);
        assert_eq!(param(&params, "strand"), None);
    }

    #[test]
    fn test_gene_and_protein_default_to_xml() {
        let gene = FetchRequest::gene("7157").query_params(ReturnFormat::default());
        assert_eq!(param(&gene, "retmode"), Some("xml"));
        assert_eq!(param(&gene, "rettype"), None);

        let protein =
            FetchRequest::protein(vec!["NP_000537".into()]).query_params(ReturnFormat::default());
        assert_eq!(param(&protein, "retmode"), Some("xml"));
        assert_eq!(param(&protein, "rettype"), Some("gp"));
    }

    #[test]
    fn test_json_format_has_no_rettype() {
        let params = FetchRequest::protein(vec!["NP_1".into()]).query_params(ReturnFormat::Json);
        assert_eq!(param(&params, "retmode"), Some("json"));
        assert_eq!(param(&params, "rettype"), None);
    }

    #[test]
    fn test_protein_batch_joins_ids() {
        let request = FetchRequest::protein(vec!["NP_1".into(), "NP_2".into()]);
        let params = request.query_params(ReturnFormat::Json);
        assert_eq!(param(&params, "id"), Some("NP_1,NP_2"));
        assert_eq!(request.target(), "ID(s) NP_1,NP_2");
    }

    #[test]
    fn test_search_and_post_endpoints() {
        let search = FetchRequest::Search {
            database: Database::Protein,
            term: "p53".to_string(),
        };
        assert_eq!(search.endpoint(), Endpoint::Search);
        assert!(search.ids().is_empty());
        assert_eq!(search.target(), "term 'p53'");

        let post = FetchRequest::PostIds {
            database: Database::Protein,
            ids: vec!["NP_1".into()],
        };
        assert_eq!(post.endpoint().path(), "epost.fcgi");
    }
}
