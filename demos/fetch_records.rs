/// Example fetching gene, protein and nucleotide records through the cache
///
/// This example shows how to:
/// 1. Load configuration from the environment (or a `.env` file)
/// 2. Look up single records and serve repeats from the cache
/// 3. Fetch a protein batch, with unresolvable IDs isolated by bisection
/// 4. Fetch a windowed nucleotide sequence and run a term search
///
/// Run with:
/// ```bash
/// SEQCACHE_EMAIL=you@example.org \
/// SEQCACHE_MAX_RETRIES=2 \
/// SEQCACHE_TIMEOUT_SECS=15 \
/// RUST_LOG=seqcache=debug \
/// cargo run --example fetch_records
/// ```
///
/// Set SEQCACHE_API_KEY to raise the service's request allowance.
use anyhow::{Context, Result};
use seqcache::{AccessionId, Database, SeqcacheConfig, SequenceClient, SequenceWindow, Strand};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {e}"))?;

    let config = SeqcacheConfig::from_env().context("Invalid SEQCACHE_* configuration")?;
    let client =
        SequenceClient::from_config(&config).context("Failed to create sequence client")?;

    let gene_id = env::var("GENE_ID").unwrap_or_else(|_| "7157".to_string());
    let gene = client.gene(gene_id.as_str()).await;
    info!(
        id = %gene.id(),
        status = %gene.status(),
        symbol = gene.text("/Entrezgene_gene/Gene-ref/Gene-ref_locus").unwrap_or("-"),
        "Fetched gene"
    );

    // Second lookup is answered from the cache
    let again = client.gene(gene_id.as_str()).await;
    info!(status = %again.status(), "Fetched gene again");

    let proteins: Vec<AccessionId> = ["NP_000537", "NP_001119584", "not-an-accession", ""]
        .into_iter()
        .map(AccessionId::new)
        .collect();
    for record in client.proteins(&proteins).await {
        info!(
            id = %record.id(),
            status = %record.status(),
            definition = record.text("/GBSeq_definition").unwrap_or("-"),
            "Protein"
        );
    }

    let exon = client
        .nucleotide(
            "NM_000546",
            Some(SequenceWindow::new(1, 120)),
            Some(Strand::Plus),
        )
        .await;
    info!(
        status = %exon.status(),
        length = exon.len(),
        header = exon.header().unwrap_or("-"),
        "Fetched nucleotide window"
    );

    if let Some(result) = client.search(Database::Gene, "TP53[sym] AND human[orgn]").await {
        info!(count = result.count, ids = result.ids.len(), "Search finished");
    }

    let stats = client.cache_stats().await;
    info!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.entries,
        "Cache statistics"
    );

    Ok(())
}
