//! Elasticsearch-backed search mirror over its REST API.
//!
//! ## Versioning
//! Upserts are sent with `version_type=external_gte` and the primary row's
//! version, so Elasticsearch itself rejects a write older than the stored
//! document (HTTP 409). Re-sending the same version is accepted, which keeps
//! upserts idempotent. Deletes leave a tombstone one version above the row.
//! Elasticsearch keeps delete tombstones only for `index.gc_deletes` (60s by
//! default); a stale upsert arriving after that window recreates the document.
//!
//! ## Setup
//! Writes never go to an index this client has not set up. When
//! [`SearchIndex::ensure_index`] has not succeeded yet, the first upsert or
//! delete runs it, so a cluster that was down at startup still gets the
//! geo-point mapping instead of one inferred from the first document.
//!
//! ## Endpoints
//! Several base URLs may be configured. A request that fails to connect or
//! times out is retried against the next URL; any HTTP response ends the loop.

pub mod response;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use milonga_core::config::SearchConfig;
use milonga_core::error::CoreError;
use milonga_core::model::event::Event;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde_json::{Value, json};
use tokio::sync::OnceCell;

use crate::document::{EventDocument, GEO_FIELD, index_mappings};
use crate::error::{SearchError, SearchResult};
use crate::index::{IndexStatus, RadiusPage, SearchIndex, UpsertOutcome, tombstone_version};
use crate::query::{GeoRadius, ResultOrder, radius_search_body};

use self::response::{ErrorResponse, MappingResponse, SearchResponse, TotalRelation};

const RESOURCE_ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Connection and behaviour settings for [`ElasticIndex`].
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub urls: Vec<String>,
    pub index: String,
    pub page_size: u32,
    pub order: ResultOrder,
    pub refresh_on_write: bool,
    pub timeout: Duration,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<&SearchConfig> for ElasticConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            urls: config.urls.clone(),
            index: config.index.clone(),
            page_size: config.page_size,
            order: ResultOrder::from_nearest_first(config.nearest_first),
            refresh_on_write: config.refresh_on_write,
            timeout: Duration::from_secs(config.timeout_secs),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// Search mirror stored in an Elasticsearch index.
#[derive(Debug, Clone)]
pub struct ElasticIndex {
    client: Client,
    endpoints: Vec<Url>,
    index: String,
    page_size: u32,
    order: ResultOrder,
    refresh_on_write: bool,
    username: Option<String>,
    password: Option<String>,
    ready: Arc<OnceCell<()>>,
}

impl ElasticIndex {
    /// ## Summary
    /// Builds the HTTP client. No request is made until the first call.
    ///
    /// ## Errors
    /// Returns an error if no URL is configured, a URL cannot be parsed, or
    /// the HTTP client cannot be built.
    pub fn new(config: ElasticConfig) -> SearchResult<Self> {
        if config.urls.is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "at least one search index URL is required".to_string(),
            )
            .into());
        }

        let endpoints = config
            .urls
            .iter()
            .map(|raw| {
                let url = Url::parse(raw).map_err(|e| SearchError::InvalidUrl {
                    url: raw.clone(),
                    reason: e.to_string(),
                })?;
                if url.cannot_be_a_base() {
                    return Err(SearchError::InvalidUrl {
                        url: raw.clone(),
                        reason: "not a base URL".to_string(),
                    });
                }
                Ok(url)
            })
            .collect::<SearchResult<Vec<_>>>()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoints,
            index: config.index,
            page_size: config.page_size,
            order: config.order,
            refresh_on_write: config.refresh_on_write,
            username: config.username,
            password: config.password,
            ready: Arc::new(OnceCell::new()),
        })
    }

    /// ## Summary
    /// Builds the client from application settings.
    ///
    /// ## Errors
    /// See [`ElasticIndex::new`].
    pub fn from_settings(config: &SearchConfig) -> SearchResult<Self> {
        Self::new(ElasticConfig::from(config))
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn endpoint_url(base: &Url, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Sends one request, failing over to the next endpoint on transport errors.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> SearchResult<Response> {
        let mut last_error = None;

        for base in &self.endpoints {
            let url = Self::endpoint_url(base, segments, query);
            let mut request = self.client.request(method.clone(), url);
            if let Some(username) = &self.username {
                request = request.basic_auth(username, self.password.as_deref());
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!(endpoint = %base, error = %e, "Search endpoint unreachable, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_error.map_or(
            SearchError::CoreError(CoreError::InvariantViolation(
                "search index has no endpoints",
            )),
            SearchError::from,
        ))
    }

    async fn unexpected(response: Response) -> SearchError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        SearchError::UnexpectedStatus { status, body }
    }

    fn write_params(&self, version: i64, version_type: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("version", version.to_string()),
            ("version_type", version_type.to_string()),
        ];
        if self.refresh_on_write {
            query.push(("refresh", "wait_for".to_string()));
        }
        query
    }

    async fn bootstrap(&self) -> SearchResult<IndexStatus> {
        let response = self.send(Method::HEAD, &[self.index.as_str()], &[], None).await?;

        match response.status() {
            StatusCode::OK => {
                self.verify_mapping().await?;
                tracing::debug!("Search index already exists");
                Ok(IndexStatus::Existing)
            }
            StatusCode::NOT_FOUND => self.create_index().await,
            _ => Err(Self::unexpected(response).await),
        }
    }

    /// Sets the index up on first use if startup setup did not succeed.
    async fn ensure_ready(&self) -> SearchResult<()> {
        self.ready
            .get_or_try_init(|| async {
                tracing::info!(index = %self.index, "Search index not set up yet, setting up before write");
                self.bootstrap().await.map(|_| ())
            })
            .await?;
        Ok(())
    }

    async fn create_index(&self) -> SearchResult<IndexStatus> {
        let body = json!({ "mappings": index_mappings() });
        let response = self
            .send(Method::PUT, &[self.index.as_str()], &[], Some(&body))
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(index = %self.index, "Search index created");
            return Ok(IndexStatus::Created);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST
            && ErrorResponse::kind_of(&body).as_deref() == Some(RESOURCE_ALREADY_EXISTS)
        {
            tracing::debug!(index = %self.index, "Search index created concurrently");
            self.verify_mapping().await?;
            return Ok(IndexStatus::Existing);
        }

        Err(SearchError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }

    async fn verify_mapping(&self) -> SearchResult<()> {
        let response = self
            .send(Method::GET, &[self.index.as_str(), "_mapping"], &[], None)
            .await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }

        let bytes = response.bytes().await?;
        let mappings: MappingResponse = serde_json::from_slice(&bytes)?;

        for (name, mapping) in &mappings {
            match mapping.mappings.field_type(GEO_FIELD) {
                Some("geo_point") => {}
                other => {
                    return Err(SearchError::MappingMismatch(format!(
                        "index '{name}' maps '{GEO_FIELD}' as {}, expected geo_point",
                        other.unwrap_or("nothing")
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for ElasticIndex {
    #[tracing::instrument(skip(self), fields(index = %self.index))]
    async fn ensure_index(&self) -> SearchResult<IndexStatus> {
        let status = self.bootstrap().await?;
        self.ready.get_or_init(|| async {}).await;
        Ok(status)
    }

    #[tracing::instrument(skip(self, event), fields(index = %self.index, event_id = event.id, version = event.version))]
    async fn upsert(&self, event: &Event) -> SearchResult<UpsertOutcome> {
        self.ensure_ready().await?;
        let document = serde_json::to_value(EventDocument::from(event))?;
        let id = event.id.to_string();
        let query = self.write_params(event.version, "external_gte");

        let response = self
            .send(
                Method::PUT,
                &[self.index.as_str(), "_doc", id.as_str()],
                &query,
                Some(&document),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(UpsertOutcome::Applied),
            StatusCode::CONFLICT => {
                tracing::debug!("Index holds a newer version, mirror write dropped");
                Ok(UpsertOutcome::Superseded)
            }
            _ => Err(Self::unexpected(response).await),
        }
    }

    #[tracing::instrument(skip(self, event), fields(index = %self.index, event_id = event.id))]
    async fn delete(&self, event: &Event) -> SearchResult<()> {
        self.ensure_ready().await?;
        let id = event.id.to_string();
        let query = self.write_params(tombstone_version(event), "external");

        let response = self
            .send(Method::DELETE, &[self.index.as_str(), "_doc", id.as_str()], &query, None)
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::debug!("Mirror document already absent");
                Ok(())
            }
            StatusCode::CONFLICT => {
                tracing::debug!("Index holds a newer version, mirror delete dropped");
                Ok(())
            }
            _ => Err(Self::unexpected(response).await),
        }
    }

    #[tracing::instrument(skip(self), fields(index = %self.index, distance = %radius.distance_param()))]
    async fn query_by_radius(&self, radius: &GeoRadius) -> SearchResult<RadiusPage> {
        let body = radius_search_body(radius, self.page_size, self.order);
        let response = self
            .send(Method::POST, &[self.index.as_str(), "_search"], &[], Some(&body))
            .await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }

        let bytes = response.bytes().await?;
        let search: SearchResponse = serde_json::from_slice(&bytes)?;

        let (total_hits, relation) = search.hits.total.map_or(
            (search.hits.hits.len() as u64, TotalRelation::Eq),
            |total| (total.value, total.relation),
        );
        let events = search
            .hits
            .hits
            .into_iter()
            .map(|hit| Event::from(hit.source))
            .collect();

        let mut page = RadiusPage::new(events, total_hits);
        if relation == TotalRelation::Gte {
            page.complete = false;
        }

        tracing::debug!(
            returned = page.events.len(),
            total_hits = page.total_hits,
            complete = page.complete,
            "Proximity query answered"
        );
        Ok(page)
    }
}
