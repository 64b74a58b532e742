//! Response envelope module
//!
//! Every server response is wrapped as `{code, data, message}`. The decoder
//! turns a raw transport response into either the unwrapped payload or a
//! typed failure.
//!
//! # Overview
//!
//! - `Envelope` - the wire wrapper
//! - `ListPayload` - list `data`, either a bare array or a page object
//! - `EnvelopeDecoder` - status + body in, `Result<Option<T>>` out

mod decoder;
mod types;

pub use decoder::EnvelopeDecoder;
pub use types::{Envelope, ListPayload, PagedList, DEFAULT_SUCCESS_CODE};
