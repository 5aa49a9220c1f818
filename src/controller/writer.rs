//! Per-request response capability handed to controllers
//!
//! Writes are buffered and turned into a hyper response once the action
//! returns. Mirrors streaming-writer rules: the first status or body write
//! finalizes headers, and later header changes are dropped.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode};
use serde::Serialize;

use crate::error::ActionError;
use crate::logger;

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON_UTF8: &str = "application/json;charset=utf-8";

#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    headers_written: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response header, replacing any previous value
    pub fn set_header(&mut self, key: &str, value: &str) -> Result<(), ActionError> {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            ActionError::InvalidHeader {
                name: key.to_string(),
                reason: e.to_string(),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| ActionError::InvalidHeader {
            name: key.to_string(),
            reason: e.to_string(),
        })?;
        self.insert_header(name, value);
        Ok(())
    }

    /// Write the status code; only the first call takes effect
    pub fn write_header(&mut self, status: StatusCode) {
        if self.headers_written {
            logger::log_warning(&format!(
                "Superfluous write_header({status}) ignored, status already {}",
                self.status
            ));
            return;
        }
        self.status = status;
        self.headers_written = true;
    }

    /// Append raw bytes to the body
    pub fn render_bytes(&mut self, bytes: &[u8]) {
        self.headers_written = true;
        self.body.extend_from_slice(bytes);
    }

    pub fn render_string(&mut self, s: &str) {
        self.insert_header(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
        self.render_bytes(s.as_bytes());
    }

    /// Serialize `value` as JSON; nothing is written when serialization fails
    pub fn render_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ActionError> {
        self.render_json_callback(value, "")
    }

    /// Like [`render_json`](Self::render_json), wrapped as `callback(<json>)`
    /// when `callback` is non-empty
    pub fn render_json_callback<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        callback: &str,
    ) -> Result<(), ActionError> {
        let json = serde_json::to_vec(value)?;

        self.insert_header(
            CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON_UTF8),
        );
        if callback.is_empty() {
            self.render_bytes(&json);
        } else {
            let mut wrapped = Vec::with_capacity(callback.len() + json.len() + 2);
            wrapped.extend_from_slice(callback.as_bytes());
            wrapped.push(b'(');
            wrapped.extend_from_slice(&json);
            wrapped.push(b')');
            self.render_bytes(&wrapped);
        }
        Ok(())
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.headers_written {
            logger::log_warning(&format!(
                "Header '{name}' set after the response was started; ignored"
            ));
            return;
        }
        self.headers.insert(name, value);
    }
}
