//! Client for the Diamond Club community API

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::community::{CommunityEvent, CommunityUser};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum CommunityApiError {
    #[error("community API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("community API returned status {0}")]
    Status(u16),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsersData {
    #[serde(default)]
    user_details_with_token_count: Vec<CommunityUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsData {
    #[serde(default)]
    event_details: Vec<CommunityEvent>,
}

#[derive(Clone)]
pub struct CommunityApiService {
    client: Client,
    base_url: String,
    access_token: String,
}

impl CommunityApiService {
    pub fn new(base_url: String, access_token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn users_url(&self, limit: Option<u32>) -> String {
        match limit {
            Some(limit) => format!("{}/admin/users?limit={}", self.base_url, limit),
            None => format!("{}/admin/users", self.base_url),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/admin/events/", self.base_url)
    }

    async fn get<T>(&self, url: &str) -> Result<Option<T>, CommunityApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!(url = %url, "Calling community API");
        let response = self
            .client
            .get(url)
            .header("AccessToken", &self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            error!(url = %url, status, "Community API returned an error status");
            return Err(CommunityApiError::Status(status));
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Users from `data.userDetailsWithTokenCount`; a missing list is empty
    pub async fn fetch_users(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<CommunityUser>, CommunityApiError> {
        let data: Option<UsersData> = self.get(&self.users_url(limit)).await?;
        Ok(data.unwrap_or_default().user_details_with_token_count)
    }

    /// Events from `data.eventDetails`; a missing list is empty
    pub async fn fetch_events(&self) -> Result<Vec<CommunityEvent>, CommunityApiError> {
        let data: Option<EventsData> = self.get(&self.events_url()).await?;
        Ok(data.unwrap_or_default().event_details)
    }
}
