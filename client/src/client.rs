//! Repository client: login, create → publish, and record maintenance.
//!
//! ```text
//! POST {base}/tokens             {"email","password"} → {"token"}
//! POST {base}/{resource_type}    graph body           → Location: {record}
//! PUT  {record}/meta/state       {"current":"PUBLISHED"}
//! ```
//!
//! A failed publish leaves the record created on the repository; the
//! [`Publication`] stays [`PublicationState::Created`] and
//! [`RepositoryClient::publish`] can be retried without re-creating.

use std::fmt;
use std::sync::{Arc, Once};

use fdp_vocab::{ExchangeGraph, GraphFormat};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorKind};
use crate::observer::{PublishObserver, Stage, TracingObserver};
use crate::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

/// Media type of login and state-change bodies.
pub const JSON: &str = "application/json";

/// State value a published record reports.
pub const PUBLISHED: &str = "PUBLISHED";

static INSECURE_NOTICE: Once = Once::new();

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Serialize)]
struct StateChange<'a> {
    current: &'a str,
}

/// Record state as reported by `GET {record}/meta/state`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordStatus {
    /// Current state, e.g. `DRAFT` or `PUBLISHED`.
    pub current: String,
}

impl RecordStatus {
    /// Returns true if the repository reports the record as published.
    pub fn is_published(&self) -> bool {
        self.current.eq_ignore_ascii_case(PUBLISHED)
    }
}

/// Where a record is in the create → publish sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicationState {
    /// Not yet accepted by the repository.
    Unsubmitted,
    /// Created at the given identity, not yet public.
    Created(String),
    /// Created and publicly visible at the given identity.
    Published(String),
}

impl fmt::Display for PublicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicationState::Unsubmitted => f.write_str("unsubmitted"),
            PublicationState::Created(iri) => write!(f, "created at {iri}"),
            PublicationState::Published(iri) => write!(f, "published at {iri}"),
        }
    }
}

/// One record's progress through the repository protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    label: String,
    state: PublicationState,
}

impl Publication {
    /// An unsubmitted publication.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: PublicationState::Unsubmitted,
        }
    }

    /// A publication for a record the repository already holds at
    /// `identity`, e.g. one created in an earlier run.
    pub fn created(label: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: PublicationState::Created(identity.into()),
        }
    }

    /// Label used in logs and reports.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current state.
    pub fn state(&self) -> &PublicationState {
        &self.state
    }

    /// Repository identity, once created.
    pub fn identity(&self) -> Option<&str> {
        match &self.state {
            PublicationState::Unsubmitted => None,
            PublicationState::Created(iri) | PublicationState::Published(iri) => Some(iri),
        }
    }

    /// Returns true once the record is public.
    pub fn is_published(&self) -> bool {
        matches!(self.state, PublicationState::Published(_))
    }
}

/// An authenticated session with one repository.
///
/// The session token is shared read-only by concurrent operations and only
/// replaced when re-authentication is enabled.
pub struct RepositoryClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn PublishObserver>,
    token: RwLock<String>,
}

impl fmt::Debug for RepositoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}

impl RepositoryClient {
    /// Logs in to the repository at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Authentication`] if the credentials are refused,
    /// [`ErrorKind::Protocol`] if the base URL is unusable or the token
    /// response is malformed, and [`ErrorKind::Transport`] if the repository
    /// cannot be reached.
    pub async fn connect(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn PublishObserver>,
    ) -> Result<Self, ClientError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            ClientError::protocol(format!("invalid base URL {:?}: {e}", config.base_url))
        })?;
        if config.insecure {
            INSECURE_NOTICE.call_once(|| observer.on_insecure_transport(&config.base_url));
        }

        let client = Self {
            config,
            transport,
            observer,
            token: RwLock::new(String::new()),
        };
        let token = client.observe(Stage::Authenticate, client.login().await)?;
        *client.token.write().await = token;
        client.observer.on_authenticated(&client.config.base_url);
        Ok(client)
    }

    /// Connects over [`ReqwestTransport`], reporting through
    /// [`TracingObserver`].
    ///
    /// # Errors
    ///
    /// As [`connect`](Self::connect), plus [`ErrorKind::Transport`] if the
    /// HTTP client cannot be built.
    pub async fn connect_with_defaults(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::connect(config, Arc::new(transport), Arc::new(TracingObserver)).await
    }

    /// Settings this client was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The observer events are reported to.
    pub fn observer(&self) -> &dyn PublishObserver {
        self.observer.as_ref()
    }

    /// Submits `graph` under `resource_type` in the configured graph format
    /// and records the identity the repository assigns.
    ///
    /// # Errors
    ///
    /// See [`create_as`](Self::create_as).
    pub async fn create(
        &self,
        publication: &mut Publication,
        resource_type: &str,
        graph: &ExchangeGraph,
    ) -> Result<String, ClientError> {
        self.create_as(publication, resource_type, graph, self.config.graph_format)
            .await
    }

    /// Submits `graph` under `resource_type` serialized as `format`.
    ///
    /// On success the publication moves to [`PublicationState::Created`];
    /// on any failure it stays [`PublicationState::Unsubmitted`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidState`] if the publication was already
    /// created, [`ErrorKind::RemoteRejection`] for a non-2xx answer,
    /// [`ErrorKind::Protocol`] if the answer lacks a usable `Location`
    /// header, and [`ErrorKind::Authentication`] / [`ErrorKind::Transport`]
    /// as for any request.
    pub async fn create_as(
        &self,
        publication: &mut Publication,
        resource_type: &str,
        graph: &ExchangeGraph,
        format: GraphFormat,
    ) -> Result<String, ClientError> {
        let result = self.try_create(publication, resource_type, graph, format).await;
        let identity = self.observe(Stage::Create, result)?;
        publication.state = PublicationState::Created(identity.clone());
        self.observer.on_created(&identity);
        Ok(identity)
    }

    async fn try_create(
        &self,
        publication: &Publication,
        resource_type: &str,
        graph: &ExchangeGraph,
        format: GraphFormat,
    ) -> Result<String, ClientError> {
        if publication.state != PublicationState::Unsubmitted {
            return Err(ClientError::new(
                ErrorKind::InvalidState,
                format!("{} is already {}", publication.label, publication.state),
            ));
        }
        let url = format!(
            "{}/{}",
            self.config.base_url,
            resource_type.trim_matches('/')
        );
        let body = format.render(graph);
        let response = self
            .execute(Stage::Create, |token| {
                HttpRequest::new(Method::Post, url.clone())
                    .with_body(format.media_type(), body.clone())
                    .with_bearer(token)
            })
            .await?;
        let response = ensure_success(Stage::Create, &url, response)?;
        let location = response.header("location").ok_or_else(|| {
            ClientError::protocol(format!(
                "create at {url} succeeded with status {} but sent no Location header",
                response.status
            ))
            .with_body(response.body.clone())
        })?;
        resolve(&url, location)
    }

    /// Moves a created record to the published state.
    ///
    /// On failure the publication stays [`PublicationState::Created`] and
    /// the call may be repeated. Publishing an already published record is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidState`] for an unsubmitted publication,
    /// [`ErrorKind::RemoteRejection`] for a non-2xx answer, and
    /// [`ErrorKind::Authentication`] / [`ErrorKind::Transport`] as for any
    /// request.
    pub async fn publish(&self, publication: &mut Publication) -> Result<(), ClientError> {
        let identity = match &publication.state {
            PublicationState::Published(_) => return Ok(()),
            PublicationState::Created(iri) => iri.clone(),
            PublicationState::Unsubmitted => {
                let err = ClientError::new(
                    ErrorKind::InvalidState,
                    format!("{} has not been created", publication.label),
                );
                return self.observe(Stage::Publish, Err(err));
            }
        };
        let result = self.set_state(&identity, PUBLISHED).await;
        self.observe(Stage::Publish, result)?;
        publication.state = PublicationState::Published(identity.clone());
        self.observer.on_published(&identity);
        Ok(())
    }

    async fn set_state(&self, identity: &str, state: &str) -> Result<(), ClientError> {
        let url = state_url(identity);
        let body = serde_json::to_string(&StateChange { current: state })
            .map_err(|e| ClientError::protocol(e.to_string()))?;
        let response = self
            .execute(Stage::Publish, |token| {
                HttpRequest::new(Method::Put, url.clone())
                    .with_body(JSON, body.clone())
                    .with_bearer(token)
            })
            .await?;
        ensure_success(Stage::Publish, &url, response).map(drop)
    }

    /// Creates and then publishes, leaving `publication` at the state
    /// reached.
    ///
    /// # Errors
    ///
    /// The first error of [`create`](Self::create) or
    /// [`publish`](Self::publish).
    pub async fn create_and_publish(
        &self,
        publication: &mut Publication,
        resource_type: &str,
        graph: &ExchangeGraph,
    ) -> Result<String, ClientError> {
        let identity = self.create(publication, resource_type, graph).await?;
        self.publish(publication).await?;
        Ok(identity)
    }

    /// Retrieves the repository's description of `identity` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::RemoteRejection`] for a non-2xx answer, and
    /// [`ErrorKind::Authentication`] / [`ErrorKind::Transport`] as for any
    /// request.
    pub async fn fetch(&self, identity: &str, format: GraphFormat) -> Result<String, ClientError> {
        let result = async {
            let response = self
                .execute(Stage::Fetch, |token| {
                    HttpRequest::new(Method::Get, identity)
                        .with_accept(format.media_type())
                        .with_bearer(token)
                })
                .await?;
            ensure_success(Stage::Fetch, identity, response).map(|r| r.body)
        }
        .await;
        self.observe(Stage::Fetch, result)
    }

    /// Replaces the description of `identity` with `graph`.
    ///
    /// # Errors
    ///
    /// As [`fetch`](Self::fetch).
    pub async fn update(&self, identity: &str, graph: &ExchangeGraph) -> Result<(), ClientError> {
        let format = self.config.graph_format;
        let body = format.render(graph);
        let result = async {
            let response = self
                .execute(Stage::Update, |token| {
                    HttpRequest::new(Method::Put, identity)
                        .with_body(format.media_type(), body.clone())
                        .with_bearer(token)
                })
                .await?;
            ensure_success(Stage::Update, identity, response).map(drop)
        }
        .await;
        self.observe(Stage::Update, result)
    }

    /// Deletes the record at `identity`.
    ///
    /// # Errors
    ///
    /// As [`fetch`](Self::fetch).
    pub async fn delete(&self, identity: &str) -> Result<(), ClientError> {
        let result = async {
            let response = self
                .execute(Stage::Delete, |token| {
                    HttpRequest::new(Method::Delete, identity).with_bearer(token)
                })
                .await?;
            ensure_success(Stage::Delete, identity, response).map(drop)
        }
        .await;
        self.observe(Stage::Delete, result)
    }

    /// Reads the publication state of `identity`.
    ///
    /// # Errors
    ///
    /// As [`fetch`](Self::fetch), plus [`ErrorKind::Protocol`] if the state
    /// document is malformed.
    pub async fn state(&self, identity: &str) -> Result<RecordStatus, ClientError> {
        let url = state_url(identity);
        let result = async {
            let response = self
                .execute(Stage::State, |token| {
                    HttpRequest::new(Method::Get, url.clone())
                        .with_accept(JSON)
                        .with_bearer(token)
                })
                .await?;
            let response = ensure_success(Stage::State, &url, response)?;
            serde_json::from_str::<RecordStatus>(&response.body).map_err(|e| {
                ClientError::protocol(format!("malformed state document from {url}: {e}"))
                    .with_body(response.body.clone())
            })
        }
        .await;
        self.observe(Stage::State, result)
    }

    async fn login(&self) -> Result<String, ClientError> {
        let url = format!("{}/tokens", self.config.base_url);
        let body = serde_json::to_string(&Credentials {
            email: &self.config.email,
            password: &self.config.password,
        })
        .map_err(|e| ClientError::protocol(e.to_string()))?;
        let response = self
            .send(
                Stage::Authenticate,
                HttpRequest::new(Method::Post, url.clone()).with_body(JSON, body),
            )
            .await?;
        if !response.is_success() {
            return Err(ClientError::new(
                ErrorKind::Authentication,
                format!("login at {url} refused with status {}", response.status),
            )
            .with_body(response.body));
        }
        let token: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            ClientError::protocol(format!("malformed token response from {url}: {e}"))
                .with_body(response.body.clone())
        })?;
        Ok(token.token)
    }

    /// Sends the request built for the current token. With
    /// re-authentication enabled, a 401 answer triggers one fresh login
    /// and one resend.
    async fn execute(
        &self,
        stage: Stage,
        build: impl Fn(&str) -> HttpRequest,
    ) -> Result<HttpResponse, ClientError> {
        let token = self.token.read().await.clone();
        let response = self.send(stage, build(&token)).await?;
        if response.status != 401 || !self.config.reauthenticate_on_401 {
            return Ok(response);
        }

        self.observer.on_reauthenticate(stage);
        let fresh = self.login().await?;
        *self.token.write().await = fresh.clone();
        self.send(stage, build(&fresh)).await
    }

    async fn send(&self, stage: Stage, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.observer.on_request(stage, request.method, &request.url);
        self.transport.send(request).await
    }

    fn observe<T>(&self, stage: Stage, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            self.observer.on_failure(stage, err);
        }
        result
    }

}

/// Resolves a `Location` header against the URL of the request it answered.
fn resolve(request_url: &str, location: &str) -> Result<String, ClientError> {
    reqwest::Url::parse(request_url)
        .and_then(|url| url.join(location.trim()))
        .map(String::from)
        .map_err(|e| ClientError::protocol(format!("invalid Location header {location:?}: {e}")))
}

fn state_url(identity: &str) -> String {
    format!("{}/meta/state", identity.trim_end_matches('/'))
}

fn ensure_success(
    stage: Stage,
    url: &str,
    response: HttpResponse,
) -> Result<HttpResponse, ClientError> {
    if response.is_success() {
        return Ok(response);
    }
    let kind = match response.status {
        401 | 403 => ErrorKind::Authentication,
        _ => ErrorKind::RemoteRejection,
    };
    Err(ClientError::new(
        kind,
        format!("{stage} at {url} failed with status {}", response.status),
    )
    .with_body(response.body))
}
