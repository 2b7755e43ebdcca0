//! In-memory [`Transport`] for tests.
//!
//! Responses are scripted per method and URL suffix; every request is
//! recorded for later inspection.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ClientError;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

#[derive(Debug)]
struct Route {
    method: Method,
    suffix: String,
    replies: VecDeque<Result<HttpResponse, ClientError>>,
}

/// Scripted transport. Unmatched requests receive `404`.
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    /// A transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method` requests whose URL ends with `suffix`. Replies
    /// queued on one route are used in order; the last one repeats.
    #[must_use]
    pub fn respond(self, method: Method, suffix: &str, response: HttpResponse) -> Self {
        self.reply(method, suffix, Ok(response))
    }

    /// Fails `method` requests whose URL ends with `suffix` with `error`.
    #[must_use]
    pub fn fail(self, method: Method, suffix: &str, error: ClientError) -> Self {
        self.reply(method, suffix, Err(error))
    }

    /// Answers `POST …/tokens` with `token`.
    #[must_use]
    pub fn with_login(self, token: &str) -> Self {
        self.respond(
            Method::Post,
            "/tokens",
            HttpResponse::new(200).with_body(format!(r#"{{"token":"{token}"}}"#)),
        )
    }

    fn reply(
        mut self,
        method: Method,
        suffix: &str,
        reply: Result<HttpResponse, ClientError>,
    ) -> Self {
        let routes = self.routes.get_mut();
        match routes
            .iter_mut()
            .find(|route| route.method == method && route.suffix == suffix)
        {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                method,
                suffix: suffix.to_owned(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// Every request sent so far, in order.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests sent with `method`.
    pub async fn requests_with(&self, method: Method) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = request.method;
        let url = request.url.clone();
        self.requests.lock().await.push(request);

        let mut routes = self.routes.lock().await;
        let Some(route) = routes
            .iter_mut()
            .find(|route| route.method == method && url.ends_with(&route.suffix))
        else {
            return Ok(HttpResponse::new(404));
        };
        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        };
        reply.unwrap_or_else(|| Ok(HttpResponse::new(404)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_order_then_repeat_last() {
        let fake = FakeTransport::new()
            .respond(Method::Put, "/meta/state", HttpResponse::new(500))
            .respond(Method::Put, "/meta/state", HttpResponse::new(200));
        let request = HttpRequest::new(Method::Put, "https://e.org/dataset/1/meta/state");
        assert_eq!(fake.send(request.clone()).await.unwrap().status, 500);
        assert_eq!(fake.send(request.clone()).await.unwrap().status, 200);
        assert_eq!(fake.send(request).await.unwrap().status, 200);
        assert_eq!(fake.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn unmatched_requests_get_404() {
        let fake = FakeTransport::new();
        let response = fake
            .send(HttpRequest::new(Method::Get, "https://e.org/missing"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
    }
}
