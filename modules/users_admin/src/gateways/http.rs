//! reqwest-backed implementation of [`UsersAdminApi`] speaking the users REST API.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::api::rest::dto::{
    ErrorBody, UpdateUserReq, UpdateUserResponse, UserListResponse, UserStatsResponse,
};
use crate::contract::{
    client::UsersAdminApi,
    error::UsersAdminError,
    model::{ListQuery, ListResult, StatusFilter, User, UserId, UserPatch, UserStats},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HttpUsersClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpUsersClient {
    /// Client rooted at `base_url` (e.g. `http://127.0.0.1:8087`).
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("'{base_url}' cannot be used as a base URL");
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `/api/users` with `page` and `pageSize` always set; `query` and
    /// `status` only when they restrict the result.
    pub fn list_url(&self, query: &ListQuery) -> Url {
        let mut url = self.endpoint(&["api", "users"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("pageSize", &query.page_size.to_string());
            if !query.search_text.is_empty() {
                pairs.append_pair("query", &query.search_text);
            }
            if query.status_filter != StatusFilter::All {
                pairs.append_pair("status", query.status_filter.as_str());
            }
        }
        url
    }

    fn user_url(&self, id: &UserId) -> Url {
        self.endpoint(&["api", "users", id.as_str()])
    }
}

fn transport_error(e: reqwest::Error) -> UsersAdminError {
    warn!(error = %e, "users API request failed before a response");
    UsersAdminError::network(e.to_string())
}

/// Turn a non-2xx response into a contract error. `id` is set for per-user
/// endpoints, where 404 means the user is unknown.
async fn error_from_response(resp: Response, id: Option<&UserId>) -> UsersAdminError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };
    debug!(status = status.as_u16(), %message, "users API returned an error");

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => UsersAdminError::not_found(id.clone()),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            UsersAdminError::validation(message)
        }
        _ => UsersAdminError::server(status.as_u16(), message),
    }
}

async fn decode<T: DeserializeOwned>(
    resp: Response,
    id: Option<&UserId>,
) -> Result<T, UsersAdminError> {
    if !resp.status().is_success() {
        return Err(error_from_response(resp, id).await);
    }
    let status = resp.status().as_u16();
    resp.json::<T>()
        .await
        .map_err(|e| UsersAdminError::server(status, format!("invalid response body: {e}")))
}

#[async_trait]
impl UsersAdminApi for HttpUsersClient {
    #[instrument(
        name = "users_admin.http.list_users",
        skip(self, query),
        fields(page = query.page)
    )]
    async fn list_users(&self, query: &ListQuery) -> Result<ListResult, UsersAdminError> {
        let resp = self
            .client
            .get(self.list_url(query))
            .send()
            .await
            .map_err(transport_error)?;
        let body: UserListResponse = decode(resp, None).await?;
        Ok(body.into())
    }

    #[instrument(name = "users_admin.http.user_stats", skip(self))]
    async fn user_stats(&self) -> Result<UserStats, UsersAdminError> {
        let resp = self
            .client
            .get(self.endpoint(&["api", "users", "stats"]))
            .send()
            .await
            .map_err(transport_error)?;
        let body: UserStatsResponse = decode(resp, None).await?;
        Ok(body.data.into())
    }

    #[instrument(name = "users_admin.http.update_user", skip(self, patch), fields(user_id = %id))]
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, UsersAdminError> {
        let resp = self
            .client
            .patch(self.user_url(id))
            .json(&UpdateUserReq::from(patch))
            .send()
            .await
            .map_err(transport_error)?;
        let body: UpdateUserResponse = decode(resp, Some(id)).await?;
        Ok(body.data.into())
    }

    #[instrument(name = "users_admin.http.delete_user", skip(self), fields(user_id = %id))]
    async fn delete_user(&self, id: &UserId) -> Result<(), UsersAdminError> {
        let resp = self
            .client
            .delete(self.user_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(resp, Some(id)).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_url_omits_default_filters() {
        let client = HttpUsersClient::new("http://localhost:8087").unwrap();
        let url = client.list_url(&ListQuery::default());
        assert_eq!(url.as_str(), "http://localhost:8087/api/users?page=1&pageSize=10");
    }

    #[test]
    fn list_url_encodes_search_and_status() {
        let client = HttpUsersClient::new("http://localhost:8087/").unwrap();
        let query = ListQuery::new(20)
            .with_page(3)
            .with_search("john smith")
            .with_status(StatusFilter::Inactive);
        let url = client.list_url(&query);
        assert_eq!(
            url.as_str(),
            "http://localhost:8087/api/users?page=3&pageSize=20&query=john+smith&status=inactive"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = HttpUsersClient::new("http://localhost/admin/").unwrap();
        assert_eq!(
            client.user_url(&UserId::from("user-7")).as_str(),
            "http://localhost/admin/api/users/user-7"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpUsersClient::new("mailto:ops@example.com").is_err());
    }
}
