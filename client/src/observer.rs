//! Observability collaborator passed to the repository client.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::transport::Method;

/// Step of the repository protocol an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `POST {base}/tokens`
    Authenticate,
    /// `POST {base}/{resource_type}`
    Create,
    /// `PUT {record}/meta/state`
    Publish,
    /// `GET {record}`
    Fetch,
    /// `PUT {record}`
    Update,
    /// `DELETE {record}`
    Delete,
    /// `GET {record}/meta/state`
    State,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Authenticate => "authenticate",
            Stage::Create => "create",
            Stage::Publish => "publish",
            Stage::Fetch => "fetch",
            Stage::Update => "update",
            Stage::Delete => "delete",
            Stage::State => "state",
        })
    }
}

/// Receives client events. Every method defaults to doing nothing.
pub trait PublishObserver: fmt::Debug + Send + Sync {
    /// A request is about to be sent.
    fn on_request(&self, _stage: Stage, _method: Method, _url: &str) {}

    /// A token was obtained for `base_url`.
    fn on_authenticated(&self, _base_url: &str) {}

    /// A 401 triggered a fresh login before retrying.
    fn on_reauthenticate(&self, _stage: Stage) {}

    /// A record was created at `identity`.
    fn on_created(&self, _identity: &str) {}

    /// A record at `identity` was published.
    fn on_published(&self, _identity: &str) {}

    /// An operation failed.
    fn on_failure(&self, _stage: Stage, _error: &ClientError) {}

    /// Certificate verification is disabled. Reported once per process.
    fn on_insecure_transport(&self, _base_url: &str) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PublishObserver for TracingObserver {
    fn on_request(&self, stage: Stage, method: Method, url: &str) {
        debug!(%stage, %method, url, "repository request");
    }

    fn on_authenticated(&self, base_url: &str) {
        info!(base_url, "authenticated");
    }

    fn on_reauthenticate(&self, stage: Stage) {
        info!(%stage, "token rejected, logging in again");
    }

    fn on_created(&self, identity: &str) {
        info!(identity, "record created");
    }

    fn on_published(&self, identity: &str) {
        info!(identity, "record published");
    }

    fn on_failure(&self, stage: Stage, error: &ClientError) {
        warn!(%stage, kind = %error.kind, body = error.body.as_deref(), "{}", error.message);
    }

    fn on_insecure_transport(&self, base_url: &str) {
        warn!(base_url, "TLS certificate verification is disabled");
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PublishObserver for NoopObserver {}
