// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cached record lookups.
//!
//! [`SequenceClient`] is the entry point for callers. Each lookup checks the cache
//! for its record kind, short-circuits invalid identifiers, and otherwise drives a
//! fresh retry budget against the fetch gateway. Lookups never fail: the outcome is
//! reported through the returned record's [`RecordStatus`](crate::records::RecordStatus).

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn, Instrument};

use crate::batch::{fetch_batch, BatchEntry};
use crate::cache::{CacheKey, CacheStats, MemoryCache, NoOpCache, RecordCache};
use crate::config::SeqcacheConfig;
use crate::decode::{
    FastaDecoder, PayloadDecoder, PostDecoder, PostReceipt, RecordListDecoder, SearchDecoder,
    SearchResult, SingleRecord,
};
use crate::errors::SeqcacheError;
use crate::gateway::FetchGateway;
use crate::records::{FromPayload, GeneRecord, NucleotideRecord, ProteinRecord, RecordPayload};
use crate::retry::{AttemptOutcome, RetryCoordinator, RetryPolicy};
use crate::spans;
use crate::transport::{EutilsClient, RawResponse, RemoteService};
use crate::types::{AccessionId, Database, SequenceWindow, Strand};

/// Caching, retrying client for gene, protein and nucleotide records
///
/// # Example
///
/// ```rust,no_run
/// use seqcache::{SeqcacheConfig, SequenceClient};
///
/// # async fn example() -> Result<(), seqcache::SeqcacheError> {
/// let config = SeqcacheConfig::resilient().with_email("curator@example.org");
/// let client = SequenceClient::from_config(&config)?;
///
/// let gene = client.gene("7157").await;
/// println!("{} is {}", gene.id(), gene.status());
/// # Ok(())
/// # }
/// ```
pub struct SequenceClient<S> {
    gateway: FetchGateway<S>,
    policy: RetryPolicy,
    gene_decoder: RecordListDecoder,
    protein_decoder: RecordListDecoder,
    genes: Box<dyn RecordCache<GeneRecord>>,
    proteins: Box<dyn RecordCache<ProteinRecord>>,
    nucleotides: Box<dyn RecordCache<NucleotideRecord>>,
}

impl SequenceClient<EutilsClient> {
    /// Creates a client talking to the E-utilities endpoint in `config`
    pub fn from_config(config: &SeqcacheConfig) -> Result<Self, SeqcacheError> {
        let service = EutilsClient::new(config)?;
        Ok(Self::new(service, config))
    }
}

impl<S: RemoteService> SequenceClient<S> {
    /// Creates a client over any remote service
    ///
    /// The identity and base URL in `config` are not used here; they belong to the
    /// service.
    pub fn new(service: S, config: &SeqcacheConfig) -> Self {
        info!(
            service = service.name(),
            timeout_ms = config.network_timeout.as_millis() as u64,
            max_retries = config.max_retries,
            cache_enabled = config.cache_enabled,
            format = config.return_format.retmode(),
            "Creating sequence client"
        );

        Self {
            gateway: FetchGateway::new(service, config.network_timeout),
            policy: config.retry_policy(),
            gene_decoder: RecordListDecoder::gene(config.return_format),
            protein_decoder: RecordListDecoder::protein(config.return_format),
            genes: new_cache(config.cache_enabled),
            proteins: new_cache(config.cache_enabled),
            nucleotides: new_cache(config.cache_enabled),
        }
    }

    pub fn gateway(&self) -> &FetchGateway<S> {
        &self.gateway
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Looks up one gene record
    pub async fn gene(&self, id: impl Into<AccessionId>) -> Arc<GeneRecord> {
        let id = id.into();
        let gateway = &self.gateway;
        let target = &id;

        self.get_object(
            self.genes.as_ref(),
            CacheKey::from_id(&id),
            &id,
            move || gateway.fetch_gene(target),
            &SingleRecord(self.gene_decoder),
            |payload| GeneRecord::from_payload(id.clone(), payload),
        )
        .await
    }

    /// Looks up one protein record
    ///
    /// The response is decoded as a one-element batch, so the record holds the same
    /// document a [`proteins`](Self::proteins) lookup of the same ID would.
    pub async fn protein(&self, id: impl Into<AccessionId>) -> Arc<ProteinRecord> {
        let id = id.into();
        let gateway = &self.gateway;
        let batch = std::slice::from_ref(&id);

        self.get_object(
            self.proteins.as_ref(),
            CacheKey::from_id(&id),
            &id,
            move || gateway.fetch_protein(batch),
            &SingleRecord(self.protein_decoder),
            |payload| ProteinRecord::from_payload(id.clone(), payload),
        )
        .await
    }

    /// Looks up a nucleotide sequence, optionally restricted to a window and strand
    ///
    /// Each window and strand combination is cached separately.
    pub async fn nucleotide(
        &self,
        id: impl Into<AccessionId>,
        window: Option<SequenceWindow>,
        strand: Option<Strand>,
    ) -> Arc<NucleotideRecord> {
        let id = id.into();
        let gateway = &self.gateway;
        let target = &id;

        self.get_object(
            self.nucleotides.as_ref(),
            CacheKey::nucleotide(&id, window, strand),
            &id,
            move || gateway.fetch_nucleotide(target, window, strand),
            &FastaDecoder,
            |payload| NucleotideRecord::from_payload(id.clone(), payload).with_region(window, strand),
        )
        .await
    }

    /// Looks up several protein records with as few requests as possible
    ///
    /// Cached identifiers are answered from the cache and invalid identifiers yield
    /// empty records. The rest are fetched in one batch, which is bisected until the
    /// identifiers that cannot be resolved are isolated; those yield not-found
    /// records. The result is index-aligned with `ids`.
    pub async fn proteins(&self, ids: &[AccessionId]) -> Vec<Arc<ProteinRecord>> {
        let mut resolved: Vec<Option<Arc<ProteinRecord>>> = Vec::with_capacity(ids.len());
        let mut pending: Vec<AccessionId> = Vec::new();

        for id in ids {
            if let Some(hit) = self.proteins.get(&CacheKey::from_id(id)).await {
                resolved.push(Some(hit));
            } else if id.is_invalid() {
                resolved.push(Some(self.protein(id).await));
            } else {
                if !pending.contains(id) {
                    pending.push(id.clone());
                }
                resolved.push(None);
            }
        }

        let mut fetched: HashMap<AccessionId, Arc<ProteinRecord>> = HashMap::new();
        if !pending.is_empty() {
            let gateway = &self.gateway;
            let fetch =
                move |ids: Vec<AccessionId>| async move { gateway.fetch_protein(&ids).await };
            let entries = fetch_batch(&pending, &fetch, &self.protein_decoder, self.policy).await;

            for (id, entry) in pending.iter().zip(entries) {
                let payload = match entry {
                    BatchEntry::Found(document) => RecordPayload::Decoded(document),
                    BatchEntry::Unresolved => {
                        error!(id = %id, kind = ProteinRecord::KIND, "Unable to fetch record");
                        RecordPayload::NotFound
                    }
                };
                let record = Arc::new(ProteinRecord::from_payload(id.clone(), payload));
                self.proteins
                    .insert(CacheKey::from_id(id), record.clone())
                    .await;
                fetched.insert(id.clone(), record);
            }
        }

        resolved
            .into_iter()
            .zip(ids)
            .map(|(record, id)| {
                record
                    .or_else(|| fetched.get(id).cloned())
                    .unwrap_or_else(|| {
                        Arc::new(ProteinRecord::from_payload(id.clone(), RecordPayload::NotFound))
                    })
            })
            .collect()
    }

    /// Searches a database by term; `None` when the retry budget runs out
    ///
    /// Search results are not cached.
    pub async fn search(&self, database: Database, term: &str) -> Option<SearchResult> {
        let gateway = &self.gateway;
        let outcome = self
            .run_uncached(move || gateway.search(database, term), &SearchDecoder)
            .await;
        if outcome.is_none() {
            error!(%database, term, "Unable to complete search");
        }
        outcome
    }

    /// Submits an identifier list; `None` when the retry budget runs out
    pub async fn post_ids(&self, database: Database, ids: &[AccessionId]) -> Option<PostReceipt> {
        let gateway = &self.gateway;
        let outcome = self
            .run_uncached(move || gateway.post_ids(database, ids), &PostDecoder)
            .await;
        if outcome.is_none() {
            error!(%database, ids = %AccessionId::join(ids), "Unable to submit identifiers");
        }
        outcome
    }

    /// Combined statistics of the gene, protein and nucleotide caches
    pub async fn cache_stats(&self) -> CacheStats {
        let parts = [
            self.genes.stats().await,
            self.proteins.stats().await,
            self.nucleotides.stats().await,
        ];
        parts.iter().fold(CacheStats::default(), |total, part| CacheStats {
            hits: total.hits + part.hits,
            misses: total.misses + part.misses,
            inserts: total.inserts + part.inserts,
            entries: total.entries + part.entries,
        })
    }

    /// Drops every cached record
    pub async fn clear_caches(&self) {
        self.genes.clear().await;
        self.proteins.clear().await;
        self.nucleotides.clear().await;
    }

    async fn get_object<R, D, F, Fut, B>(
        &self,
        cache: &dyn RecordCache<R>,
        key: CacheKey,
        id: &AccessionId,
        fetch: F,
        decoder: &D,
        build: B,
    ) -> Arc<R>
    where
        R: FromPayload,
        D: PayloadDecoder<Output = R::Payload>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<RawResponse>>,
        B: FnOnce(RecordPayload<R::Payload>) -> R,
    {
        async move {
            if let Some(hit) = cache.get(&key).await {
                return hit;
            }

            let payload = if id.is_invalid() {
                warn!(
                    id = %id,
                    "The ID {} is an invalid accession number, and the database will not be queried",
                    id
                );
                RecordPayload::Empty
            } else {
                let mut coordinator = RetryCoordinator::new(self.policy);
                match coordinator.run_to_completion(fetch, decoder).await {
                    AttemptOutcome::Payload(payload) => RecordPayload::Decoded(payload),
                    AttemptOutcome::Transient | AttemptOutcome::Exhausted => {
                        error!(
                            id = %id,
                            kind = R::KIND,
                            attempts = coordinator.budget().attempts_made(),
                            "Unable to fetch record"
                        );
                        RecordPayload::NotFound
                    }
                }
            };

            let record = Arc::new(build(payload));
            cache.insert(key, record.clone()).await;
            record
        }
        .instrument(spans::fetch_record(R::KIND, id))
        .await
    }

    async fn run_uncached<D, F, Fut>(&self, fetch: F, decoder: &D) -> Option<D::Output>
    where
        D: PayloadDecoder,
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<RawResponse>>,
    {
        RetryCoordinator::new(self.policy)
            .run_to_completion(fetch, decoder)
            .await
            .payload()
    }
}

fn new_cache<V>(enabled: bool) -> Box<dyn RecordCache<V>>
where
    V: Send + Sync + 'static,
{
    if enabled {
        Box::new(MemoryCache::new())
    } else {
        Box::new(NoOpCache)
    }
}
