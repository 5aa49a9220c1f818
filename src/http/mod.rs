//! HTTP protocol layer module
//!
//! Response builders, query parsing, MIME and cache helpers shared by the
//! dispatcher and the file server.

pub mod cache;
pub mod mime;
pub mod query;
pub mod response;

pub use query::QueryParams;
pub use response::{
    build_304_response, build_404_response, build_500_response, build_default_404_response,
    build_empty_response, build_file_response,
};

/// Body type produced by every handler in this crate
pub type Body = http_body_util::Full<hyper::body::Bytes>;
