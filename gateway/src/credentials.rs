//! Token conversion output: real credentials obtained upstream, padded with
//! clearly flagged simulated placeholders up to a fixed quota.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum number of records returned per conversion.
pub const QUOTA: usize = 18;

/// Characters of the input token echoed into each simulated record.
const SUFFIX_CHARS: usize = 5;

/// Length of the random fragment in a simulated record.
const FRAGMENT_CHARS: usize = 8;

pub const SIMULATED_NOTE: &str =
    "simulated placeholder: not issued by any authorization service and not valid for use";

/// Ordered tags for simulated records. Every tag starts with `SIM` so a
/// placeholder can never be mistaken for a real Graph credential.
pub const CATALOGUE: [&str; QUOTA] = [
    "SIMUSER", "SIMAPP", "SIMPAGE", "SIMIGBIZ", "SIMADS", "SIMBIZ", "SIMGAME", "SIMWORK",
    "SIMLIVE", "SIMMSGR", "SIMCRTR", "SIMSHOP", "SIMEVENT", "SIMGROUP", "SIMWATCH", "SIMMKTG",
    "SIMINSGT", "SIMDEV",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    UserLongLived,
    AppAccessToken,
    PageAccessToken,
    InstagramBusinessAccount,
    Simulated,
}

/// One entry of a conversion result.
///
/// Exactly one of `token` / `id` is set: `id` for
/// [`CredentialKind::InstagramBusinessAccount`], `token` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub kind: CredentialKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub simulated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CredentialRecord {
    fn real(kind: CredentialKind, token: String) -> Self {
        Self {
            kind,
            token: Some(token),
            id: None,
            simulated: false,
            page_id: None,
            page_name: None,
            label: None,
            note: None,
        }
    }

    pub fn user_long_lived(token: impl Into<String>) -> Self {
        Self::real(CredentialKind::UserLongLived, token.into())
    }

    pub fn app_access_token(token: impl Into<String>) -> Self {
        Self::real(CredentialKind::AppAccessToken, token.into())
    }

    pub fn page_access_token(
        token: impl Into<String>,
        page_id: impl Into<String>,
        page_name: Option<String>,
    ) -> Self {
        Self {
            page_id: Some(page_id.into()),
            page_name,
            ..Self::real(CredentialKind::PageAccessToken, token.into())
        }
    }

    pub fn instagram_business_account(id: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            kind: CredentialKind::InstagramBusinessAccount,
            token: None,
            id: Some(id.into()),
            simulated: false,
            page_id: Some(page_id.into()),
            page_name: None,
            label: None,
            note: None,
        }
    }

    pub fn simulated(label: &str, token: String) -> Self {
        Self {
            kind: CredentialKind::Simulated,
            token: Some(token),
            id: None,
            simulated: true,
            page_id: None,
            page_name: None,
            label: Some(label.to_string()),
            note: Some(SIMULATED_NOTE.to_string()),
        }
    }

    /// The opaque value of the record, whichever field carries it.
    pub fn value(&self) -> &str {
        self.token
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }
}

/// Envelope returned by a token conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub requested_at: DateTime<Utc>,
    pub total: usize,
    pub tokens: Vec<CredentialRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

impl ConversionResult {
    pub fn new(
        requested_at: DateTime<Utc>,
        tokens: Vec<CredentialRecord>,
        debug: Option<serde_json::Value>,
    ) -> Self {
        Self {
            requested_at,
            total: tokens.len(),
            tokens,
            debug,
        }
    }
}

/// Materializes the conversion output using the thread-local RNG.
pub fn materialize(input_token: &str, real: Vec<CredentialRecord>) -> Vec<CredentialRecord> {
    materialize_with(&mut rand::thread_rng(), input_token, real)
}

/// Keeps up to [`QUOTA`] real records in their upstream order and fills the
/// remaining slots with simulated ones.
///
/// Never fails: any string is accepted as `input_token`, including the empty
/// string. A seeded `rng` makes the output fully reproducible.
pub fn materialize_with<R: Rng>(
    rng: &mut R,
    input_token: &str,
    real: Vec<CredentialRecord>,
) -> Vec<CredentialRecord> {
    let mut out: Vec<CredentialRecord> = real.into_iter().take(QUOTA).collect();
    let needed = QUOTA - out.len();
    if needed == 0 {
        return out;
    }

    let suffix: String = input_token.chars().take(SUFFIX_CHARS).collect();
    out.extend((0..needed).map(|i| {
        let label = CATALOGUE[i % CATALOGUE.len()];
        let fragment: String = (0..FRAGMENT_CHARS)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        CredentialRecord::simulated(label, format!("{label}{suffix}{fragment}{i:02}"))
    }));
    out
}
