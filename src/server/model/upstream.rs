//! Transport-neutral envelope for responses from upstream providers.
//!
//! Every outbound call returns an [`UpstreamResponse`] instead of a `Result` so the retry
//! policy can classify it and decide whether to re-issue the request. Conversion into a
//! [`LookupError`] only happens once the caller is done retrying.

use std::time::Duration;

use crate::server::error::lookup::LookupError;

/// How the provider answered a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamStatus {
    /// The provider answered with this HTTP-like status code
    Code(u16),
    /// The request never produced a response (connection refused, reset, DNS, ...)
    Transport,
    /// The attempt was abandoned after the per-attempt timeout elapsed
    TimedOut,
}

/// Coarse classification used by retry policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 4xx, the request itself is at fault and repeating it will not help
    ClientError,
    /// 5xx, transport failures and timeouts
    ServerError,
    /// Anything else, e.g. an unexpected redirect
    Unexpected,
}

/// Response from an upstream provider.
#[derive(Clone, Debug)]
pub struct UpstreamResponse<T> {
    /// Endpoint description used in logs and errors, e.g. `GET /characters/42/`
    pub endpoint: String,
    pub status: UpstreamStatus,
    /// Decoded body; `None` for failures or when a successful body could not be decoded
    pub body: Option<T>,
    /// Cache lifetime suggested by the provider
    pub max_age: Option<Duration>,
}

impl<T> UpstreamResponse<T> {
    /// Successful response carrying a decoded body
    pub fn ok(endpoint: impl Into<String>, body: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: UpstreamStatus::Code(200),
            body: Some(body),
            max_age: None,
        }
    }

    /// Response with the given status code and no body
    pub fn status(endpoint: impl Into<String>, code: u16) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: UpstreamStatus::Code(code),
            body: None,
            max_age: None,
        }
    }

    pub fn transport_failure(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: UpstreamStatus::Transport,
            body: None,
            max_age: None,
        }
    }

    pub fn timed_out(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: UpstreamStatus::TimedOut,
            body: None,
            max_age: None,
        }
    }

    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Classifies the response for retry decisions
    pub fn class(&self) -> StatusClass {
        match self.status {
            UpstreamStatus::Code(code) => match code {
                200..=299 => StatusClass::Success,
                400..=499 => StatusClass::ClientError,
                500..=599 => StatusClass::ServerError,
                _ => StatusClass::Unexpected,
            },
            UpstreamStatus::Transport | UpstreamStatus::TimedOut => StatusClass::ServerError,
        }
    }

    /// Status code, if the provider answered at all
    pub fn code(&self) -> Option<u16> {
        match self.status {
            UpstreamStatus::Code(code) => Some(code),
            _ => None,
        }
    }

    /// Transforms the body of a response while keeping its status and cache hints
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UpstreamResponse<U> {
        UpstreamResponse {
            endpoint: self.endpoint,
            status: self.status,
            body: self.body.map(f),
            max_age: self.max_age,
        }
    }

    /// Converts the final response of a request into the decoded body or a lookup error.
    ///
    /// # Returns
    /// - `Ok(T)` - Successful response with a decodable body
    /// - `Err(LookupError::UpstreamRejected)` - Client error, or success with an undecodable body
    /// - `Err(LookupError::Timeout)` - Last attempt timed out
    /// - `Err(LookupError::UpstreamUnavailable)` - Server error, transport failure or unexpected status
    pub fn into_result(self) -> Result<T, LookupError> {
        let class = self.class();
        let code = self.code();

        match (class, self.body) {
            (StatusClass::Success, Some(body)) => Ok(body),
            (StatusClass::Success, None) | (StatusClass::ClientError, _) => {
                Err(LookupError::UpstreamRejected {
                    endpoint: self.endpoint,
                    status: code,
                })
            }
            _ if self.status == UpstreamStatus::TimedOut => Err(LookupError::Timeout(self.endpoint)),
            _ => Err(LookupError::UpstreamUnavailable {
                endpoint: self.endpoint,
                status: code,
            }),
        }
    }
}
