use serde::{Deserialize, Serialize};

/// Subset of GitHub's `GET /users/{username}` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub site_admin: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile as returned by the gateway's `/github` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GitHubProfile {
    pub username: String,
    pub uid: u64,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub company: String,
    pub followers: u64,
    pub following: u64,
    pub repos_public: u64,
    pub site_admin: &'static str,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub avatar: Option<String>,
}

fn or_none(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "None".to_string())
}

impl From<GitHubUser> for GitHubProfile {
    fn from(user: GitHubUser) -> Self {
        Self {
            username: user.login,
            uid: user.id,
            name: or_none(user.name),
            bio: or_none(user.bio),
            location: or_none(user.location),
            company: or_none(user.company),
            followers: user.followers,
            following: user.following,
            repos_public: user.public_repos,
            site_admin: if user.site_admin { "✅" } else { "❌" },
            created: user.created_at,
            updated: user.updated_at,
            avatar: user.avatar_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_reshaping() {
        let user: GitHubUser = serde_json::from_value(json!({
            "login": "octocat",
            "id": 583231,
            "name": "The Octocat",
            "bio": null,
            "location": "San Francisco",
            "company": "",
            "followers": 9000,
            "following": 9,
            "public_repos": 8,
            "site_admin": false,
            "created_at": "2011-01-25T18:44:36Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "unrelated": {"nested": true}
        }))
        .unwrap();

        let json = serde_json::to_value(GitHubProfile::from(user)).unwrap();
        assert_eq!(json["USERNAME"], "octocat");
        assert_eq!(json["UID"], 583231);
        assert_eq!(json["NAME"], "The Octocat");
        assert_eq!(json["BIO"], "None");
        assert_eq!(json["COMPANY"], "None");
        assert_eq!(json["FOLLOWERS"], 9000);
        assert_eq!(json["REPOS_PUBLIC"], 8);
        assert_eq!(json["SITE_ADMIN"], "❌");
        assert_eq!(json["CREATED"], "2011-01-25T18:44:36Z");
        assert!(json.get("AVATAR").is_some());
    }
}
