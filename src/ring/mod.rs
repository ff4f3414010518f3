//! The protocol-neutral request/response model exchanged between the
//! HTTP boundary and the dynamic handler.
//!
//! # Data Flow
//! ```text
//! native request
//!     → request.rs (method, pruned path, ordered headers, decoded body)
//!     → [dynamic handler]
//!     → response.rs (status, headers, keyword-keyed body)
//!     → stringify_keys at the boundary, exactly once
//! ```
//!
//! # Design Decisions
//! - Headers are an ordered pair list; lookup is case-insensitive but
//!   values are carried as given
//! - A request body exists only for body-bearing methods; absent and
//!   empty are distinct, observable states
//! - Response bodies use a distinguished `Keyword` key type until the
//!   moment they leave the process

pub mod request;
pub mod response;

pub use request::{BodyDecodeError, FormParams, NormalizedRequest, RequestBody};
pub use response::{Keyword, KwValue, NormalizedResponse};
