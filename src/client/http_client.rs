use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use tracing::debug;

use super::*;

/// Raw status and JSON body, for callers asserting on the wire contract.
#[derive(Clone, Debug)]
pub struct Probe {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl Probe {
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(|v| v.as_str())
    }
}

impl AdminClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map a non-2xx response onto [`ApiError`]; pass successes through.
    pub(super) fn ensure_ok(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = read_body(resp);
        Err(ApiError::from_status(status, &body))
    }

    /// Send a protected request with the session's bearer token.
    ///
    /// The access token is refreshed first when it is about to expire. A 403
    /// on a token that has expired by the time the response arrives triggers
    /// exactly one refresh and one retry.
    pub(super) fn send_authed<F>(&mut self, label: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        if self.config.proactive_refresh {
            self.ensure_fresh()?;
        }

        let resp = self.dispatch(&build)?;
        if resp.status() == StatusCode::FORBIDDEN && self.state() == SessionState::NeedsRefresh {
            debug!(label, "access token expired in flight; refreshing once and retrying");
            self.refresh()?;
            let resp = self.dispatch(&build)?;
            return self.ensure_ok(resp);
        }
        self.ensure_ok(resp)
    }

    fn dispatch<F>(&self, build: &F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let session = self.session.as_ref().ok_or(ApiError::NoSession)?;
        Ok(build(&self.client)
            .bearer_auth(session.access_token())
            .send()?)
    }

    pub(super) fn parse<T: serde::de::DeserializeOwned>(
        resp: Response,
        label: &str,
    ) -> Result<T, ApiError> {
        resp.json::<T>()
            .map_err(|e| ApiError::Decode(format!("{}: {}", label, e)))
    }

    /// Issue a request with an explicit `Authorization` value (or none) and
    /// report status and body as-is. No session state is read or changed.
    pub fn probe(
        &self,
        method: reqwest::Method,
        path: &str,
        authorization: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<Probe, ApiError> {
        let mut req = self.client.request(method, self.url(path));
        if let Some(value) = authorization {
            req = req.header(reqwest::header::AUTHORIZATION, value);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send()?;
        let status = resp.status();
        Ok(Probe {
            status,
            body: read_body(resp),
        })
    }

    pub fn health(&self) -> Result<serde_json::Value, ApiError> {
        let resp = self.client.get(self.url("/api/health")).send()?;
        let resp = self.ensure_ok(resp)?;
        Self::parse(resp, "health")
    }
}

pub(super) fn read_body(resp: Response) -> serde_json::Value {
    resp.json::<serde_json::Value>()
        .unwrap_or(serde_json::Value::Null)
}
