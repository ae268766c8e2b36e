//! Authenticated HTTP transport for the admin API.
//!
//! # Overview
//!
//! - [`HttpClient`]: async client that attaches the bearer token and JSON headers
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a parsed response
//! - [`HttpMethod`]: GET, POST, PUT, DELETE
//! - [`DataType`]: content types for request bodies
//!
//! # Failure Behavior
//!
//! Any non-2xx status becomes [`HttpError::Response`] carrying the status
//! code and the raw body. Requests are never retried.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
