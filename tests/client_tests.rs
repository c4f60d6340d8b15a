// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for cached record lookups through SequenceClient
//!
//! Covers cache hits, invalid identifiers, terminal failures and batch protein
//! lookups against a scripted service, in both JSON and XML return formats.

mod helpers;

use helpers::{
    ids, protein_echo, protein_set_for, records_for, test_config, xml_config, MockService,
};
use seqcache::{
    AccessionId, Database, FetchRequest, RawResponse, RecordStatus, SeqcacheConfigBuilder,
    SequenceClient, TransportError,
};
use std::sync::Arc;

#[tokio::test]
async fn test_cache_hit_returns_identical_record_without_network() {
    let service = Arc::new(MockService::always(r#"{"name": "TP53"}"#));
    let client = SequenceClient::new(service.clone(), &test_config(0));

    let first = client.gene("7157").await;
    let second = client.gene("7157").await;

    assert!(Arc::ptr_eq(&first, &second), "Cache hit should return the same record");
    assert_eq!(service.calls(), 1);
    assert_eq!(first.status(), RecordStatus::Found);

    let stats = client.cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.entries, 1);
}

#[tokio::test]
async fn test_invalid_id_never_contacts_service() {
    let service = Arc::new(MockService::always("{}"));
    let client = SequenceClient::new(service.clone(), &test_config(5));

    for id in ["", "   ", "NP_1,NP_2", "NM 000546"] {
        let record = client.protein(id).await;
        assert_eq!(record.status(), RecordStatus::Empty, "'{id}' should be invalid");
    }
    let sequence = client.nucleotide(AccessionId::invalid(), None, None).await;
    assert_eq!(sequence.status(), RecordStatus::Empty);

    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_exhausted_lookup_is_cached_as_not_found() {
    let service = Arc::new(MockService::failing(TransportError::http(
        500,
        "Internal Server Error",
    )));
    let client = SequenceClient::new(service.clone(), &test_config(1));

    let record = client.gene("7157").await;
    assert_eq!(record.status(), RecordStatus::NotFound);
    assert!(record.document().is_none());
    assert_eq!(service.calls(), 2);

    let again = client.gene("7157").await;
    assert!(Arc::ptr_eq(&record, &again));
    assert_eq!(service.calls(), 2, "Not-found records should be served from cache");
}

#[tokio::test]
async fn test_undecodable_response_consumes_attempts() {
    let service = Arc::new(MockService::always("<html>Too Many Requests</html>"));
    let client = SequenceClient::new(service.clone(), &test_config(2));

    let record = client.gene("7157").await;

    assert_eq!(record.status(), RecordStatus::NotFound);
    assert_eq!(service.calls(), 3);
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let failures = std::sync::atomic::AtomicUsize::new(2);
    let service = Arc::new(MockService::new(move |_| {
        let remaining = failures.load(std::sync::atomic::Ordering::SeqCst);
        if remaining > 0 {
            failures.store(remaining - 1, std::sync::atomic::Ordering::SeqCst);
            Err(TransportError::connection(None))
        } else {
            Ok(RawResponse::new(r#"{"name": "TP53"}"#))
        }
    }));
    let client = SequenceClient::new(service.clone(), &test_config(2));

    let record = client.gene("7157").await;

    assert_eq!(record.text("/name"), Some("TP53"));
    assert_eq!(service.calls(), 3);
}

#[tokio::test]
async fn test_disabled_cache_refetches_every_time() {
    let service = Arc::new(MockService::always("{}"));
    let config = SeqcacheConfigBuilder::from_config(test_config(0))
        .cache_enabled(false)
        .build();
    let client = SequenceClient::new(service.clone(), &config);

    let first = client.gene("7157").await;
    let second = client.gene("7157").await;
    client.gene(AccessionId::invalid()).await;

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn test_nucleotide_request_carries_region() {
    let service = Arc::new(MockService::always(">NM_000546.6 TP53\nGATTACA\nGATTACA\n"));
    let client = SequenceClient::new(service.clone(), &test_config(0));
    let window = seqcache::SequenceWindow::new(20, 7);

    let record = client
        .nucleotide("NM_000546", Some(window), Some(seqcache::Strand::Minus))
        .await;

    assert_eq!(record.sequence(), Some("GATTACAGATTACA"));
    assert_eq!(record.header(), Some("NM_000546.6 TP53"));
    assert_eq!(
        service.requests(),
        vec![FetchRequest::nucleotide(
            "NM_000546",
            Some(window),
            Some(seqcache::Strand::Minus)
        )]
    );
}

#[tokio::test]
async fn test_proteins_fetch_only_uncached_ids() {
    let service = Arc::new(MockService::new(protein_echo));
    let client = SequenceClient::new(service.clone(), &test_config(0));

    let cached = client.protein("NP_B").await;
    assert_eq!(service.calls(), 1);

    let request = ids(&["NP_A", "NP_B", "NP_A", "", "NP_C"]);
    let records = client.proteins(&request).await;

    assert_eq!(records.len(), 5);
    assert!(Arc::ptr_eq(&records[1], &cached));
    assert!(Arc::ptr_eq(&records[0], &records[2]));
    assert_eq!(records[3].status(), RecordStatus::Empty);
    assert_eq!(
        records[4].field("/accession").and_then(|v| v.as_str()),
        Some("NP_C")
    );

    let requests = service.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1], FetchRequest::protein(ids(&["NP_A", "NP_C"])));
}

#[tokio::test]
async fn test_proteins_isolate_poisoned_id() {
    let service = Arc::new(MockService::new(|request: &FetchRequest| {
        if request.ids().iter().any(|id| id.as_str() == "NP_BAD") {
            Err(TransportError::http(400, "Bad Request"))
        } else {
            Ok(records_for(request.ids()))
        }
    }));
    let client = SequenceClient::new(service.clone(), &test_config(0));

    let records = client
        .proteins(&ids(&["NP_1", "NP_2", "NP_BAD", "NP_3"]))
        .await;

    let statuses: Vec<RecordStatus> = records.iter().map(|r| r.status()).collect();
    assert_eq!(
        statuses,
        vec![
            RecordStatus::Found,
            RecordStatus::Found,
            RecordStatus::NotFound,
            RecordStatus::Found,
        ]
    );

    let calls = service.calls();
    let bad = client.protein("NP_BAD").await;
    assert_eq!(bad.status(), RecordStatus::NotFound);
    assert_eq!(service.calls(), calls, "Unresolved IDs should be cached");
}

#[tokio::test]
async fn test_empty_protein_batch_makes_no_calls() {
    let service = Arc::new(MockService::new(protein_echo));
    let client = SequenceClient::new(service.clone(), &test_config(3));

    assert!(client.proteins(&[]).await.is_empty());
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_search_decodes_results() {
    let service = Arc::new(MockService::always(
        r#"{"esearchresult": {"count": "3", "idlist": ["7157", "7158", "7159"]}}"#,
    ));
    let client = SequenceClient::new(service.clone(), &test_config(0));

    let result = client
        .search(Database::Gene, "TP53[sym] AND human[orgn]")
        .await
        .expect("search should succeed");

    assert_eq!(result.count, 3);
    assert_eq!(result.ids, ids(&["7157", "7158", "7159"]));
}

#[tokio::test]
async fn test_search_returns_none_when_exhausted() {
    let service = Arc::new(MockService::always(
        r#"{"esearchresult": {"ERROR": "Invalid query"}}"#,
    ));
    let client = SequenceClient::new(service.clone(), &test_config(1));

    assert!(client.search(Database::Protein, "(((").await.is_none());
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn test_post_ids_returns_receipt() {
    let service = Arc::new(MockService::always(
        "<ePostResult><QueryKey>1</QueryKey><WebEnv>MCID_abc</WebEnv></ePostResult>",
    ));
    let client = SequenceClient::new(service.clone(), &test_config(0));

    let receipt = client
        .post_ids(Database::Protein, &ids(&["NP_1", "NP_2"]))
        .await
        .expect("post should succeed");

    assert_eq!(receipt.web_env, "MCID_abc");
    assert_eq!(receipt.query_key, "1");
}

#[tokio::test]
async fn test_gene_xml_is_decoded_by_default() {
    let service = Arc::new(MockService::always(include_str!(
        "fixtures/entrezgene_tp53.xml"
    )));
    let client = SequenceClient::new(service.clone(), &xml_config(0));

    let gene = client.gene("7157").await;

    assert_eq!(gene.status(), RecordStatus::Found);
    assert_eq!(gene.text("/Entrezgene_gene/Gene-ref/Gene-ref_locus"), Some("TP53"));
    assert_eq!(
        gene.text("/Entrezgene_source/BioSource/BioSource_org/Org-ref/Org-ref_taxname"),
        Some("Homo sapiens")
    );
    assert_eq!(gene.text("/Entrezgene_type/@value"), Some("protein-coding"));
    assert_eq!(
        gene.field("/Entrezgene_gene/Gene-ref/Gene-ref_syn/Gene-ref_syn_E")
            .and_then(|v| v.as_array())
            .map(Vec::len),
        Some(3)
    );
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn test_json_body_under_xml_format_is_retried() {
    let service = Arc::new(MockService::always(r#"{"name": "TP53"}"#));
    let client = SequenceClient::new(service.clone(), &xml_config(1));

    let gene = client.gene("7157").await;

    assert_eq!(gene.status(), RecordStatus::NotFound);
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn test_protein_batch_xml_stays_aligned() {
    let service = Arc::new(MockService::always(include_str!("fixtures/gbset_p53.xml")));
    let client = SequenceClient::new(service.clone(), &xml_config(0));

    let records = client
        .proteins(&ids(&["NP_000537", "NP_001119584"]))
        .await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text("/GBSeq_accession-version"), Some("NP_000537.3"));
    assert_eq!(records[1].text("/GBSeq_accession-version"), Some("NP_001119584.1"));
    assert_eq!(records[0].text("/GBSeq_length"), Some("393"));
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn test_protein_xml_batch_bisects_short_answers() {
    // The service silently drops records it cannot serve
    let service = Arc::new(MockService::new(|request: &FetchRequest| {
        let served: Vec<AccessionId> = request
            .ids()
            .iter()
            .filter(|id| id.as_str() != "NP_GONE")
            .cloned()
            .collect();
        Ok(protein_set_for(&served))
    }));
    let client = SequenceClient::new(service.clone(), &xml_config(0));

    let records = client
        .proteins(&ids(&["NP_1", "NP_GONE", "NP_2", "NP_3"]))
        .await;

    let loci: Vec<Option<&str>> = records.iter().map(|r| r.text("/GBSeq_locus")).collect();
    assert_eq!(loci, vec![Some("NP_1"), None, Some("NP_2"), Some("NP_3")]);
    assert_eq!(records[1].status(), RecordStatus::NotFound);
}

#[tokio::test]
async fn test_single_protein_matches_batch_document_xml() {
    let single = SequenceClient::new(MockService::new(xml_protein_answer), &xml_config(0));
    let batch = SequenceClient::new(MockService::new(xml_protein_answer), &xml_config(0));

    let one = single.protein("NP_000537").await;
    let many = batch.proteins(&ids(&["NP_000537"])).await;

    assert_eq!(one.document(), many[0].document());
    assert_eq!(one.text("/GBSeq_locus"), Some("NP_000537"));
}

#[tokio::test]
async fn test_single_protein_matches_batch_document_json() {
    let single = SequenceClient::new(MockService::new(protein_echo), &test_config(0));
    let batch = SequenceClient::new(MockService::new(protein_echo), &test_config(0));

    let one = single.protein("NP_000537").await;
    let many = batch.proteins(&ids(&["NP_000537"])).await;

    assert_eq!(one.document(), many[0].document());
    assert_eq!(one.text("/accession"), Some("NP_000537"));
    assert!(!one.document().is_some_and(|d| d.is_array()));
}

fn xml_protein_answer(request: &FetchRequest) -> Result<RawResponse, TransportError> {
    Ok(protein_set_for(request.ids()))
}

#[tokio::test]
async fn test_single_protein_rejects_multi_record_answer() {
    let service = Arc::new(MockService::new(|_: &FetchRequest| {
        Ok(records_for(&ids(&["NP_1", "NP_2"])))
    }));
    let client = SequenceClient::new(service.clone(), &test_config(1));

    let record = client.protein("NP_1").await;

    assert_eq!(record.status(), RecordStatus::NotFound);
    assert_eq!(service.calls(), 2);
}
