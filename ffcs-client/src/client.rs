use ffcs_core::{
    Cursor, Value,
    identifier,
    model::{CampaignScope, status::TransitionPolicy},
    normalize::{Record, decode_record, decode_records},
    outcome::{InsertOutcome, InsertShape, UpdateOutcome, UpdateShape},
};
use garde::Validate;
use serde::Serialize;

use crate::{
    config::Config,
    error::{Error, Result},
    transport::{HttpTransport, Method, Request, Transport},
};

mod admin;
mod library;
mod notification;
mod plate;
mod well;

/// Access to the FFCS database service.
///
/// Every method is one or more blocking exchanges with the service; nothing
/// is cached between calls.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
    policy: TransitionPolicy,
}

impl Client<HttpTransport> {
    /// # Errors
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url().clone(), config.timeout())?;

        Ok(Self::new(transport, config.transition_policy()))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, policy: TransitionPolicy) -> Self {
        Self { transport, policy }
    }

    #[must_use]
    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn exchange(&self, request: &Request) -> Result<serde_json::Value> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let response = self.transport.send(request)?;
        let status = response.status;

        let body = response.into_json();
        if let Err(err) = &body {
            tracing::debug!(status, error = %err, path = %request.path, "request failed");
        }

        body
    }

    pub(crate) fn write<B: Validate + Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value>
    where
        B::Context: Default,
    {
        body.validate()?;

        self.exchange(&Request::new(method, path).json(body)?)
    }

    pub(crate) fn insert<B: Validate + Serialize>(&self, path: &str, body: &B, shape: InsertShape) -> Result<InsertOutcome>
    where
        B::Context: Default,
    {
        let payload = self.write(Method::Post, path, body)?;

        Ok(InsertOutcome::from_payload(&payload, shape)?)
    }

    pub(crate) fn update(&self, request: &Request, shape: UpdateShape) -> Result<UpdateOutcome> {
        let payload = self.exchange(request)?;

        Ok(UpdateOutcome::from_payload(&payload, shape)?)
    }

    pub(crate) fn one<R: Record>(&self, request: &Request) -> Result<R> {
        Ok(decode_record(self.exchange(request)?)?)
    }

    pub(crate) fn many<R: Record>(&self, request: &Request) -> Result<Vec<R>> {
        Ok(decode_records(self.exchange(request)?)?)
    }

    /// Records listed under `key` of a wrapping object.
    pub(crate) fn many_under<R: Record>(&self, request: &Request, key: &str) -> Result<Vec<R>> {
        let payload = self.exchange(request)?;

        Ok(decode_records(take_field(payload, key)?)?)
    }

    pub(crate) fn cursor<R: Record + Clone>(&self, request: &Request) -> Result<Cursor<R>> {
        Ok(Cursor::new(self.many(request)?))
    }

    /// A response with no schema: identifiers are restored by shape.
    pub(crate) fn untyped(&self, request: &Request) -> Result<Value> {
        let payload = self.exchange(request)?;

        Ok(identifier::recursive_restore(Value::from(payload)))
    }
}

/// The value under `key`, or a contract error naming it.
pub(crate) fn field<'a>(payload: &'a serde_json::Value, key: &str) -> Result<&'a serde_json::Value> {
    payload.get(key).ok_or_else(|| Error::contract(key, payload))
}

pub(crate) fn take_field(mut payload: serde_json::Value, key: &str) -> Result<serde_json::Value> {
    payload
        .get_mut(key)
        .map(serde_json::Value::take)
        .ok_or_else(|| Error::contract(key, &payload))
}

pub(crate) fn bool_field(payload: &serde_json::Value, key: &str) -> Result<bool> {
    let value = field(payload, key)?;

    value.as_bool().ok_or_else(|| Error::Format {
        field: key.to_string(),
        value: value.to_string(),
        expected: "a boolean".to_string(),
    })
}

pub(crate) fn count_field(payload: &serde_json::Value, key: &str) -> Result<u64> {
    let value = field(payload, key)?;

    value.as_u64().ok_or_else(|| Error::Format {
        field: key.to_string(),
        value: value.to_string(),
        expected: "a non-negative integer".to_string(),
    })
}

pub(crate) fn campaign_path(path: &str, scope: &CampaignScope) -> String {
    format!(
        "{path}/{}/{}",
        segment(&scope.user_account),
        segment(&scope.campaign_id)
    )
}

pub(crate) fn scoped_query(path: &str, scope: &CampaignScope) -> Request {
    Request::get(path)
        .query("user_account", &scope.user_account)
        .query("campaign_id", &scope.campaign_id)
}

/// Percent-encodes one path segment.
pub(crate) fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
