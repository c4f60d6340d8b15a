// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for seqcache integration tests
//!
//! Provides a scripted [`RemoteService`] so the caching, retry and bisection
//! layers can be exercised without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use seqcache::{
    AccessionId, FetchRequest, RawResponse, RemoteService, ReturnFormat, SeqcacheConfig,
    SeqcacheConfigBuilder, TransportError,
};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

type Handler = Box<dyn Fn(&FetchRequest) -> Result<RawResponse, TransportError> + Send + Sync>;

/// Scripted remote service
///
/// Every request is recorded, optionally delayed, and answered by the handler.
///
/// # Example
///
/// ```rust,ignore
/// let service = Arc::new(
///     MockService::new(protein_echo).with_delays(vec![Duration::from_secs(60)]),
/// );
/// let client = SequenceClient::new(service.clone(), &test_config(1));
/// client.protein("NP_000537").await;
/// assert_eq!(service.calls(), 2);
/// ```
pub struct MockService {
    handler: Handler,
    delays: Mutex<VecDeque<Duration>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockService {
    /// Create a service answering every request with `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&FetchRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delays: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A service that always answers with `body`
    pub fn always(body: &'static str) -> Self {
        Self::new(move |_| Ok(RawResponse::new(body)))
    }

    /// A service whose every request fails with `error`
    pub fn failing(error: TransportError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Delay the first calls by the given durations, one per call
    pub fn with_delays(self, delays: Vec<Duration>) -> Self {
        *self.delays.lock().unwrap() = delays.into();
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for MockService {
    async fn execute(&self, request: &FetchRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(request)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Answers protein requests with one `{"accession": ...}` record per requested ID
pub fn protein_echo(request: &FetchRequest) -> Result<RawResponse, TransportError> {
    Ok(records_for(request.ids()))
}

/// JSON array with one record per ID, in order
pub fn records_for(ids: &[AccessionId]) -> RawResponse {
    let records: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "accession": id.as_str() }))
        .collect();
    RawResponse::new(serde_json::Value::Array(records).to_string())
}

/// GenPept XML set with one `GBSeq` per ID, in order
pub fn protein_set_for(ids: &[AccessionId]) -> RawResponse {
    let records: String = ids
        .iter()
        .map(|id| {
            format!(
                "  <GBSeq>\n    <GBSeq_locus>{id}</GBSeq_locus>\n    \
                 <GBSeq_accession-version>{id}.1</GBSeq_accession-version>\n  </GBSeq>\n"
            )
        })
        .collect();
    RawResponse::new(format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"  ?>\n<GBSet>\n{records}</GBSet>\n"
    ))
}

pub fn ids(values: &[&str]) -> Vec<AccessionId> {
    values.iter().map(|value| AccessionId::new(*value)).collect()
}

/// Configuration with a short timeout and `retries` retries, requesting JSON
pub fn test_config(retries: u32) -> SeqcacheConfig {
    SeqcacheConfigBuilder::from_config(xml_config(retries))
        .return_format(ReturnFormat::Json)
        .build()
}

/// Same as [`test_config`] but keeping the default XML return format
pub fn xml_config(retries: u32) -> SeqcacheConfig {
    SeqcacheConfigBuilder::from_config(SeqcacheConfig::minimal())
        .email("tests@example.org")
        .max_retries(retries)
        .build()
}

/// In-memory log sink for a tracing fmt subscriber
///
/// ```rust,ignore
/// let logs = LogCapture::default();
/// let _guard = logs.install();
/// client.gene("7157").await;
/// assert!(logs.contents().contains("Retry number 2 of 3"));
/// ```
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route events on the current thread into this capture until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Captured lines containing `needle`
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
