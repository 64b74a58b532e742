//! Envelope decoder
//!
//! Pure function of (transport status, body bytes, success code). It never
//! retries and never lets a raw parse error escape.

use super::types::{Envelope, ListPayload, DEFAULT_SUCCESS_CODE};
use crate::error::{Error, Result};
use crate::http::RawResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

const BODY_SNIPPET_LEN: usize = 200;

/// Decodes server envelopes into payloads or typed failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeDecoder {
    success_code: i64,
}

impl Default for EnvelopeDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_CODE)
    }
}

impl EnvelopeDecoder {
    /// Create a decoder with the given success code
    pub fn new(success_code: i64) -> Self {
        Self { success_code }
    }

    /// The configured success code
    pub fn success_code(&self) -> i64 {
        self.success_code
    }

    /// Decode a transport response
    ///
    /// `Ok(None)` is a successful envelope with a null payload.
    pub fn decode<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<Option<T>> {
        self.decode_parts(response.status, &response.body)
    }

    /// Decode from a status code and body bytes
    pub fn decode_parts<T: DeserializeOwned>(&self, status: u16, body: &[u8]) -> Result<Option<T>> {
        let transport_ok = (200..300).contains(&status);

        let envelope: Envelope<Value> = match serde_json::from_slice(body) {
            Ok(envelope) => envelope,
            Err(_) if !transport_ok => {
                return Err(Error::transport(format!("HTTP {status}: {}", snippet(body))));
            }
            Err(e) => {
                return Err(Error::malformed(format!(
                    "{e} (body: {})",
                    snippet(body)
                )));
            }
        };

        if envelope.code != self.success_code {
            debug!(code = envelope.code, "Envelope carries failure code");
            return Err(Error::domain(
                envelope.code,
                envelope.message.unwrap_or_default(),
            ));
        }

        if !transport_ok {
            return Err(Error::transport(format!(
                "HTTP {status} with success envelope"
            )));
        }

        match envelope.data {
            None | Some(Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| Error::malformed(format!("Unexpected payload shape: {e}"))),
        }
    }

    /// Decode a list payload into items in server order
    ///
    /// A null payload is an empty page, not a failure.
    pub fn decode_list<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<Vec<T>> {
        Ok(self
            .decode::<ListPayload<T>>(response)?
            .map(ListPayload::into_items)
            .unwrap_or_default())
    }
}

fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= BODY_SNIPPET_LEN {
        text.into_owned()
    } else {
        let cut: String = text.chars().take(BODY_SNIPPET_LEN).collect();
        format!("{cut}...")
    }
}
