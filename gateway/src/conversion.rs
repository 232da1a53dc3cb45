//! The `/token` flow: gather real credentials from an authorization service,
//! then hand them to the materializer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::credentials::{self, ConversionResult, CredentialRecord};

pub const NOTES: [&str; 3] = [
    "Records with \"simulated\": true are placeholders and will be rejected by every real service.",
    "Real records are only returned when the deployment has an application identity configured.",
    "Treat real tokens as secrets: do not share or log them.",
];

/// Source of real credentials for a user-supplied token.
///
/// Implementations never fail: an unavailable upstream yields fewer records.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Opaque introspection result passed through as `debug`.
    async fn introspect(&self, input_token: &str) -> Option<serde_json::Value>;

    /// Real credentials in upstream order.
    async fn collect(&self, input_token: &str) -> Vec<CredentialRecord>;
}

/// Body of a `/token` response.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResponse {
    #[serde(flatten)]
    pub result: ConversionResult,
    pub notes: Vec<&'static str>,
}

impl From<ConversionResult> for ConversionResponse {
    fn from(result: ConversionResult) -> Self {
        Self {
            result,
            notes: NOTES.to_vec(),
        }
    }
}

#[derive(Clone, Default)]
pub struct TokenConverter {
    source: Option<Arc<dyn CredentialSource>>,
}

impl TokenConverter {
    /// `None` means no authorization service is configured: every record is
    /// simulated and `debug` is absent.
    pub fn new(source: Option<Arc<dyn CredentialSource>>) -> Self {
        Self { source }
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    async fn gather(&self, input_token: &str) -> (Vec<CredentialRecord>, Option<serde_json::Value>) {
        match &self.source {
            Some(source) => {
                let (debug, real) =
                    tokio::join!(source.introspect(input_token), source.collect(input_token));
                (real, debug)
            }
            None => (Vec::new(), None),
        }
    }

    pub async fn convert(&self, input_token: &str) -> ConversionResult {
        let requested_at = Utc::now();
        let (real, debug) = self.gather(input_token).await;
        ConversionResult::new(
            requested_at,
            credentials::materialize(input_token, real),
            debug,
        )
    }

    /// Same as [`convert`](Self::convert) with reproducible simulated tokens.
    pub async fn convert_seeded(&self, input_token: &str, seed: u64) -> ConversionResult {
        let requested_at = Utc::now();
        let (real, debug) = self.gather(input_token).await;
        let mut rng = StdRng::seed_from_u64(seed);
        ConversionResult::new(
            requested_at,
            credentials::materialize_with(&mut rng, input_token, real),
            debug,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialKind, QUOTA};
    use serde_json::json;

    struct FixedSource {
        real: Vec<CredentialRecord>,
    }

    #[async_trait]
    impl CredentialSource for FixedSource {
        async fn introspect(&self, input_token: &str) -> Option<serde_json::Value> {
            Some(json!({"data": {"is_valid": false, "input": input_token}}))
        }

        async fn collect(&self, _input_token: &str) -> Vec<CredentialRecord> {
            self.real.clone()
        }
    }

    #[tokio::test]
    async fn test_without_source_everything_is_simulated() {
        let converter = TokenConverter::default();
        assert!(!converter.has_source());

        let result = converter.convert("abc12").await;
        assert_eq!(result.total, QUOTA);
        assert!(result.tokens.iter().all(|r| r.simulated));
        assert!(result.debug.is_none());
    }

    #[tokio::test]
    async fn test_real_credentials_lead_and_debug_is_passed_through() {
        let source = FixedSource {
            real: vec![
                CredentialRecord::user_long_lived("long"),
                CredentialRecord::page_access_token("page", "42", None),
            ],
        };
        let converter = TokenConverter::new(Some(Arc::new(source)));

        let result = converter.convert("xyz").await;
        assert_eq!(result.total, QUOTA);
        assert_eq!(result.tokens[0].kind, CredentialKind::UserLongLived);
        assert_eq!(result.tokens[1].kind, CredentialKind::PageAccessToken);
        assert!(result.tokens[2..].iter().all(|r| r.simulated));
        assert_eq!(result.debug.unwrap()["data"]["input"], "xyz");
    }

    #[tokio::test]
    async fn test_seeded_conversion_is_reproducible() {
        let converter = TokenConverter::default();
        let a = converter.convert_seeded("abc12", 99).await;
        let b = converter.convert_seeded("abc12", 99).await;
        assert_eq!(a.tokens, b.tokens);
    }

    #[test]
    fn test_response_flattens_result_and_adds_notes() {
        let result = ConversionResult::new(Utc::now(), Vec::new(), Some(json!({"x": 1})));
        let json = serde_json::to_value(ConversionResponse::from(result)).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["debug"]["x"], 1);
        assert_eq!(json["notes"].as_array().unwrap().len(), NOTES.len());
        assert!(json.get("result").is_none());
    }
}
