use serde::Deserialize;

/// `oauth/access_token` reply, for both the user token exchange and the
/// client-credentials app token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageList {
    #[serde(default)]
    pub data: Vec<Page>,
}

/// Entry of `me/accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInstagram {
    pub instagram_business_account: Option<InstagramAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstagramAccount {
    pub id: String,
}
