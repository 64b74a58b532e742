//! Request authorizer
//!
//! Applies the header policy to every outgoing request.

use super::token_store::TokenStore;
use super::types::AuthorizerConfig;
use crate::error::{Error, Result};
use reqwest::header::{HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::Request;
use tracing::{debug, warn};

/// Marker header that opts a single request out of authorization
pub const NO_AUTH_HEADER: &str = "No-Auth";

/// Attaches `Authorization` and `Accept-Language` to non-exempt requests
#[derive(Clone)]
pub struct RequestAuthorizer {
    store: TokenStore,
    exempt_hosts: Vec<String>,
    locale: HeaderValue,
}

impl RequestAuthorizer {
    /// Create an authorizer reading from `store`
    pub fn new(store: TokenStore, config: AuthorizerConfig) -> Result<Self> {
        let locale = HeaderValue::from_str(&config.locale)
            .map_err(|e| Error::config(format!("Invalid locale '{}': {e}", config.locale)))?;
        Ok(Self {
            store,
            exempt_hosts: config.exempt_hosts,
            locale,
        })
    }

    /// Whether the request must be forwarded untouched
    ///
    /// Pre-signed object-storage URLs already carry their own signature,
    /// and an extra `Authorization` header breaks its validation.
    pub fn is_exempt(&self, request: &Request) -> bool {
        if request.headers().contains_key(NO_AUTH_HEADER) {
            return true;
        }
        let url = request.url().as_str();
        self.exempt_hosts
            .iter()
            .any(|host| url.contains(host.as_str()))
    }

    /// Authorize a request
    ///
    /// A missing credential still produces `Bearer ` so the server answers
    /// with its own auth-failure code.
    pub fn authorize(&self, mut request: Request) -> Request {
        if self.is_exempt(&request) {
            debug!(url = %request.url(), "Request exempt from authorization");
            return request;
        }

        let token = self.store.token().unwrap_or_default();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}")).unwrap_or_else(|_| {
            warn!("Stored token is not a valid header value, sending empty bearer");
            HeaderValue::from_static("Bearer ")
        });

        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT_LANGUAGE, self.locale.clone());
        request
    }

    /// The store this authorizer reads from
    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}

impl std::fmt::Debug for RequestAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthorizer")
            .field("exempt_hosts", &self.exempt_hosts)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
