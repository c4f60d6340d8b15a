//! Decoders for term searches and identifier-list submissions

use serde::{Deserialize, Serialize};

use super::xml::{child_text, parse_xml, reject_service_error};
use super::PayloadDecoder;
use crate::errors::DecodeError;
use crate::transport::RawResponse;
use crate::types::AccessionId;

/// Identifiers matching a search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches (may exceed `ids.len()`)
    pub count: u64,
    /// Matching identifiers, first page only
    pub ids: Vec<AccessionId>,
    /// How the service interpreted the term
    pub query_translation: Option<String>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    esearchresult: Option<SearchBody>,
}

#[derive(Deserialize)]
struct SearchBody {
    count: Option<String>,
    #[serde(default)]
    idlist: Vec<String>,
    querytranslation: Option<String>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
}

/// Decodes a JSON term search response
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchDecoder;

impl PayloadDecoder for SearchDecoder {
    type Output = SearchResult;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let body = raw.body().trim_start();
        if body.is_empty() {
            return Err(DecodeError::incomplete("empty response body"));
        }
        if body.starts_with('<') {
            return Err(DecodeError::not_structured(
                "received markup where JSON was expected",
            ));
        }

        let envelope: SearchEnvelope = serde_json::from_str(body)?;
        let body = envelope
            .esearchresult
            .ok_or_else(|| DecodeError::validation("missing esearchresult section"))?;
        if let Some(error) = body.error {
            return Err(DecodeError::validation(error));
        }

        let count = match body.count {
            Some(count) => count
                .trim()
                .parse::<u64>()
                .map_err(|_| DecodeError::corrupted(format!("invalid match count '{count}'")))?,
            None => body.idlist.len() as u64,
        };

        Ok(SearchResult {
            count,
            ids: body.idlist.into_iter().map(AccessionId::new).collect(),
            query_translation: body.querytranslation,
        })
    }
}

/// Server-side handle for a submitted identifier list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    /// Session token under which the list is stored
    pub web_env: String,
    /// Key of the list within the session
    pub query_key: String,
}

/// Decodes the XML receipt of an identifier-list submission
#[derive(Debug, Clone, Copy, Default)]
pub struct PostDecoder;

impl PayloadDecoder for PostDecoder {
    type Output = PostReceipt;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let document = parse_xml(raw)?;
        let root = document.root_element();
        reject_service_error(root)?;
        if !root.has_tag_name("ePostResult") {
            return Err(DecodeError::validation(format!(
                "expected <ePostResult>, got <{}>",
                root.tag_name().name()
            )));
        }

        let web_env = child_text(root, "WebEnv")
            .ok_or_else(|| DecodeError::validation("receipt has no WebEnv"))?;
        let query_key = child_text(root, "QueryKey")
            .ok_or_else(|| DecodeError::validation("receipt has no QueryKey"))?;

        Ok(PostReceipt {
            web_env: web_env.to_string(),
            query_key: query_key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result() {
        let body = r#"{"header": {"type": "esearch"}, "esearchresult": {"count": "42", "retmax": "2", "idlist": ["7157", "7158"], "querytranslation": "TP53[All Fields]"}}"#;
        let result = SearchDecoder.decode(&RawResponse::new(body)).unwrap();

        assert_eq!(result.count, 42);
        assert_eq!(result.ids, vec![AccessionId::new("7157"), AccessionId::new("7158")]);
        assert_eq!(result.query_translation.as_deref(), Some("TP53[All Fields]"));
    }

    #[test]
    fn test_search_error_is_validation_failure() {
        let body = r#"{"esearchresult": {"ERROR": "Invalid query"}}"#;
        let error = SearchDecoder.decode(&RawResponse::new(body)).unwrap_err();
        assert_eq!(error, DecodeError::validation("Invalid query"));
    }

    #[test]
    fn test_search_without_section() {
        let error = SearchDecoder
            .decode(&RawResponse::new("{\"header\": {}}"))
            .unwrap_err();
        assert!(matches!(error, DecodeError::Validation { .. }));
    }

    #[test]
    fn test_post_receipt() {
        let body = "<?xml version=\"1.0\"?>\n<ePostResult>\n\t<QueryKey>1</QueryKey>\n\t<WebEnv>MCID_abc</WebEnv>\n</ePostResult>\n";
        let receipt = PostDecoder.decode(&RawResponse::new(body)).unwrap();
        assert_eq!(receipt.query_key, "1");
        assert_eq!(receipt.web_env, "MCID_abc");
    }

    #[test]
    fn test_post_receipt_truncated() {
        let body = "<?xml version=\"1.0\"?>\n<ePostResult>\n\t<QueryKey>1</QueryKey>";
        let error = PostDecoder.decode(&RawResponse::new(body)).unwrap_err();
        assert!(matches!(error, DecodeError::IncompleteRead { .. }));
    }

    #[test]
    fn test_post_receipt_error() {
        let body = "<ePostResult><ERROR>Invalid uid</ERROR></ePostResult>";
        let error = PostDecoder.decode(&RawResponse::new(body)).unwrap_err();
        assert_eq!(error, DecodeError::validation("Invalid uid"));
    }

    #[test]
    fn test_post_receipt_ignores_lookalike_text() {
        // Tag names inside comments and CDATA are not elements
        let body = "<ePostResult>\n\t<!-- <WebEnv>stale</WebEnv> -->\n\t<QueryKey><![CDATA[2]]></QueryKey>\n\t<WebEnv>MCID_live</WebEnv>\n</ePostResult>";
        let receipt = PostDecoder.decode(&RawResponse::new(body)).unwrap();
        assert_eq!(receipt.web_env, "MCID_live");
        assert_eq!(receipt.query_key, "2");
    }

    #[test]
    fn test_post_receipt_with_attributes_and_wrong_root() {
        let body = "<ePostResult xmlns:x=\"urn:x\"><QueryKey x:kind=\"list\">3</QueryKey><WebEnv>MCID_q</WebEnv></ePostResult>";
        let receipt = PostDecoder.decode(&RawResponse::new(body)).unwrap();
        assert_eq!(receipt.query_key, "3");

        let error = PostDecoder
            .decode(&RawResponse::new("<eSearchResult><Count>0</Count></eSearchResult>"))
            .unwrap_err();
        assert!(matches!(error, DecodeError::Validation { .. }));
    }
}
