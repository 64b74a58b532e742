//! Authentication module
//!
//! Holds the current credential and authorizes outgoing requests.
//!
//! The `TokenStore` is constructed once by the hosting application and
//! shared by reference. The `RequestAuthorizer` reads it for every request
//! that is not exempt and attaches the bearer and locale headers.

mod authorizer;
mod token_store;
mod types;

pub use authorizer::{RequestAuthorizer, NO_AUTH_HEADER};
pub use token_store::TokenStore;
pub use types::{AuthorizerConfig, Credential};
