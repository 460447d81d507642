//! One blocking request/response exchange with the service.

use std::time::Duration;

use reqwest::{
    blocking::Client as HttpClient,
    header::{HeaderName, HeaderValue},
};
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

pub const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub idempotency_key: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));

        self
    }

    /// # Errors
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);

        Ok(self)
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());

        self
    }

    /// A query parameter's value, if set.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// # Errors
    /// [`Error::Status`] for a non-2xx reply and [`Error::Contract`] for a
    /// body that is not JSON.
    pub fn into_json(self) -> Result<serde_json::Value> {
        let Self { status, body } = self;

        if !(200..300).contains(&status) {
            return Err(Error::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

pub trait Transport {
    /// # Errors
    /// [`Error::Transport`] when no reply was received at all.
    fn send(&self, request: &Request) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<Response> {
        (**self).send(request)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    client: HttpClient,
}

impl HttpTransport {
    /// # Errors
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');

        Url::parse(&format!("{base}{path}")).map_err(|err| Error::InvalidRequest {
            message: format!("{path}: {err}"),
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response> {
        let Request {
            method,
            path,
            query,
            body,
            idempotency_key,
        } = request;

        let url = self.url(path)?;
        let mut builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(key) = idempotency_key {
            let value = HeaderValue::from_str(key).map_err(|err| Error::InvalidRequest {
                message: format!("idempotency key {key:?}: {err}"),
            })?;
            builder = builder.header(IDEMPOTENCY_KEY, value);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(Response { status, body })
    }
}
