// TimeEntryService over the remote REST API.
//
// Responsibilities
// - Map each port call onto its route below the configured base URL, with bearer auth when a
//   token is configured.
// - Accept both `[...]` and `{ "data": [...] }` list bodies; single entries arrive as `{ "data": ... }`.
// - Turn transport failures into RemoteError::Unreachable and non-2xx answers into
//   RemoteError::Rejected carrying the server's `message` when it sends one.

use crate::modules::time_tracking::core::ports::{RemoteError, TimeEntryService};
use crate::modules::time_tracking::core::time_entry::{
    ListFilter, NewTimeEntry, StartTimer, TimeEntry, TimeEntryPatch,
};
use crate::shared::infrastructure::connectivity::health_check::is_connectivity_error;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryList {
    Bare(Vec<TimeEntry>),
    Wrapped { data: Vec<TimeEntry> },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpTimeEntryService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTimeEntryService {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(remote_error)?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_owned(),
        };
        tracing::debug!(%status, %message, "time entry service rejected request");
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_for<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        let envelope: DataEnvelope<T> = response.json().await.map_err(remote_error)?;
        Ok(envelope.data)
    }
}

fn remote_error(error: reqwest::Error) -> RemoteError {
    if is_connectivity_error(&error) {
        RemoteError::Unreachable(error.to_string())
    } else {
        RemoteError::Decode(error.to_string())
    }
}

#[async_trait]
impl TimeEntryService for HttpTimeEntryService {
    async fn list_entries(&self, filter: &ListFilter) -> Result<Vec<TimeEntry>, RemoteError> {
        let request = self.client.get(self.url("/time-entries")).query(filter);
        let response = self.send(request).await?;
        match response.json::<EntryList>().await.map_err(remote_error)? {
            EntryList::Bare(entries) | EntryList::Wrapped { data: entries } => Ok(entries),
        }
    }

    async fn active_timer(&self) -> Result<Option<TimeEntry>, RemoteError> {
        self.send_for(self.client.get(self.url("/time-entries/active")))
            .await
    }

    async fn start_timer(&self, request: &StartTimer) -> Result<TimeEntry, RemoteError> {
        self.send_for(
            self.client
                .post(self.url("/time-entries/start"))
                .json(request),
        )
        .await
    }

    async fn stop_timer(&self, id: &str) -> Result<TimeEntry, RemoteError> {
        self.send_for(self.client.post(self.url(&format!("/time-entries/{id}/stop"))))
            .await
    }

    async fn create_entry(&self, data: &NewTimeEntry) -> Result<TimeEntry, RemoteError> {
        self.send_for(self.client.post(self.url("/time-entries")).json(data))
            .await
    }

    async fn update_entry(&self, id: &str, changes: &TimeEntryPatch) -> Result<(), RemoteError> {
        self.send(
            self.client
                .put(self.url(&format!("/time-entries/{id}")))
                .json(changes),
        )
        .await
        .map(drop)
    }

    async fn delete_entry(&self, id: &str) -> Result<(), RemoteError> {
        self.send(self.client.delete(self.url(&format!("/time-entries/{id}"))))
            .await
            .map(drop)
    }
}
