// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # seqcache
//!
//! Caching, retrying access to gene, protein and nucleotide records held by the NCBI
//! Entrez E-utilities.
//!
//! A lookup flows through three layers:
//!
//! 1. [`SequenceClient`] checks the per-kind record cache and short-circuits invalid
//!    identifiers.
//! 2. [`RetryCoordinator`] spends a bounded [`RetryBudget`] on attempts, treating
//!    failed requests and undecodable responses alike.
//! 3. [`gateway::FetchGateway`] issues one request per attempt, bounded by a per-call
//!    timeout.
//!
//! Batch protein lookups that keep failing, or that come back with the wrong number
//! of records, are bisected until the unresolvable identifiers are isolated.
//!
//! Lookups never return errors. Every outcome is a record whose
//! [`RecordStatus`](records::RecordStatus) says whether it was found, skipped as
//! invalid, or not found after the retry budget ran out. Failures are reported
//! through `tracing`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use seqcache::{SeqcacheConfig, SequenceClient, SequenceWindow, Strand};
//!
//! # async fn example() -> Result<(), seqcache::SeqcacheError> {
//! let config = SeqcacheConfig::from_env()?;
//! let client = SequenceClient::from_config(&config)?;
//!
//! let gene = client.gene("7157").await;
//! let exon = client
//!     .nucleotide("NM_000546", Some(SequenceWindow::new(1, 120)), Some(Strand::Plus))
//!     .await;
//! println!("{}: {}, {} bp", gene.id(), gene.status(), exon.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom services
//!
//! Any [`RemoteService`] can stand in for the HTTP client, which is how the test
//! suite scripts failures:
//!
//! ```rust,ignore
//! let client = SequenceClient::new(MockService::new(handler), &SeqcacheConfig::minimal());
//! ```

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod decode;
pub mod errors;
pub mod gateway;
pub mod records;
pub mod retry;
pub(crate) mod spans;
pub mod transport;
pub mod types;

pub use batch::{fetch_batch, BatchEntry};
pub use cache::{CacheKey, CacheStats, MemoryCache, NoOpCache, RecordCache};
pub use client::SequenceClient;
pub use config::{Identity, SeqcacheConfig, SeqcacheConfigBuilder};
pub use decode::{FastaRecord, PayloadDecoder, PostReceipt, SearchResult};
pub use errors::{ConfigError, DecodeError, SeqcacheError, TransportError};
pub use gateway::FetchGateway;
pub use records::{GeneRecord, NucleotideRecord, ProteinRecord, RecordStatus};
pub use retry::{AttemptOutcome, RetryBudget, RetryCoordinator, RetryPolicy};
pub use transport::{EutilsClient, RawResponse, RemoteService};
pub use types::{AccessionId, Database, FetchRequest, ReturnFormat, SequenceWindow, Strand};
