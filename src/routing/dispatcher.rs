//! Controller dispatcher
//!
//! `{base_url}{controller/key}/{action-token}`: everything before the last
//! segment selects the controller, the last segment names the action.

use std::fmt;

use hyper::{Request, Response};
use percent_encoding::percent_decode_str;

use super::registry::RouteEntry;
use super::normalize_path_key;
use crate::controller::{action_name, Context};
use crate::error::ActionError;
use crate::http::{self, Body};
use crate::logger;

/// Always ignored by the dispatcher
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Why a request got the routing 404
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMiss {
    /// The path is not under the base URL
    OutsideBaseUrl,
    /// The percent-decoded path is not valid UTF-8
    MalformedPath,
    RouteNotFound { key: String },
    ActionNotFound { key: String, action: String },
}

impl fmt::Display for RouteMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideBaseUrl => write!(f, "outside base URL"),
            Self::MalformedPath => write!(f, "path does not decode to UTF-8"),
            Self::RouteNotFound { key } => write!(f, "no controller registered at {key}"),
            Self::ActionNotFound { key, action } => {
                write!(f, "controller {key} has no {action}")
            }
        }
    }
}

/// Why a request was dropped without a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Favicon,
    /// Nothing after the base URL splits into controller key and action
    ///
    /// Deliberately answered like the favicon, an empty 200, not a 404.
    NoActionSegment,
}

/// Result of dispatching one request
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The action ran; its buffered response
    Handled(Response<Body>),
    /// The action returned an error
    Failed(ActionError),
    NotFound(RouteMiss),
    Ignored(IgnoreReason),
}

impl DispatchOutcome {
    /// HTTP response for this outcome
    ///
    /// Misses under the base URL answer `404 Not Found`; paths outside it
    /// get the generic not-found page; ignored requests get an empty 200.
    pub fn into_response(self) -> Response<Body> {
        match self {
            Self::Handled(response) => response,
            Self::Failed(_) => http::build_500_response(),
            Self::NotFound(RouteMiss::OutsideBaseUrl) => http::build_default_404_response(),
            Self::NotFound(_) => http::build_404_response(),
            Self::Ignored(_) => http::build_empty_response(),
        }
    }
}

/// Controller key and raw action token carved out of a request path
#[derive(Debug, PartialEq, Eq)]
pub enum RoutePath<'a> {
    Target { key: String, token: &'a str },
    OutsideBaseUrl,
    NoActionSegment,
}

/// Split `path` below `base_url` at its last `/`
///
/// # Examples
/// ```
/// use rust_dispatcher::routing::{parse_route_path, RoutePath};
/// assert_eq!(
///     parse_route_path("/test/admin/users/list-all", "/test/"),
///     RoutePath::Target { key: "/admin/users".to_string(), token: "list-all" }
/// );
/// assert_eq!(parse_route_path("/test/users", "/test/"), RoutePath::NoActionSegment);
/// ```
pub fn parse_route_path<'a>(path: &'a str, base_url: &str) -> RoutePath<'a> {
    let Some(rest) = path.strip_prefix(base_url) else {
        return RoutePath::OutsideBaseUrl;
    };
    let rest = rest.trim_matches('/');
    match rest.rfind('/') {
        Some(split) => RoutePath::Target {
            key: normalize_path_key(&rest[..split]),
            token: &rest[split + 1..],
        },
        None => RoutePath::NoActionSegment,
    }
}

/// Immutable controller table mounted under the base URL
pub struct Dispatcher {
    base_url: String,
    routes: Vec<RouteEntry>,
}

impl Dispatcher {
    pub(crate) fn new(base_url: String, routes: Vec<RouteEntry>) -> Self {
        Self { base_url, routes }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Route `req` to a fresh controller and run the action its path names
    ///
    /// The path is percent-decoded before it is split, so `/caf%C3%A9/x`
    /// reaches the key `/café`.
    pub fn dispatch(&self, req: Request<()>) -> DispatchOutcome {
        let uri = req.uri().clone();
        let Ok(decoded) = percent_decode_str(uri.path()).decode_utf8() else {
            return miss(uri.path(), RouteMiss::MalformedPath);
        };
        let path: &str = &decoded;

        if path == FAVICON_PATH {
            return DispatchOutcome::Ignored(IgnoreReason::Favicon);
        }

        let (key, action) = match parse_route_path(path, &self.base_url) {
            RoutePath::Target { key, token } => (key, action_name(token)),
            RoutePath::OutsideBaseUrl => return miss(path, RouteMiss::OutsideBaseUrl),
            RoutePath::NoActionSegment => {
                logger::log_route_miss(path, &"no action segment, ignored");
                return DispatchOutcome::Ignored(IgnoreReason::NoActionSegment);
            }
        };

        let Some(entry) = self.routes.iter().find(|entry| entry.key == key) else {
            return miss(path, RouteMiss::RouteNotFound { key });
        };
        if !entry.archetype.has_action(&action) {
            return miss(path, RouteMiss::ActionNotFound { key, action });
        }

        match entry.archetype.invoke(&action, Context::new(req)) {
            Some(Ok(writer)) => DispatchOutcome::Handled(writer.into_response()),
            Some(Err(err)) => {
                logger::log_action_failed(path, &action, &err);
                DispatchOutcome::Failed(err)
            }
            None => miss(path, RouteMiss::ActionNotFound { key, action }),
        }
    }
}

fn miss(path: &str, reason: RouteMiss) -> DispatchOutcome {
    logger::log_route_miss(path, &reason);
    DispatchOutcome::NotFound(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_path_root_base() {
        assert_eq!(
            parse_route_path("/ct/hello", "/"),
            RoutePath::Target {
                key: "/ct".to_string(),
                token: "hello"
            }
        );
        assert_eq!(
            parse_route_path("/ct/hello/", "/"),
            RoutePath::Target {
                key: "/ct".to_string(),
                token: "hello"
            }
        );
        assert_eq!(parse_route_path("/hello", "/"), RoutePath::NoActionSegment);
        assert_eq!(parse_route_path("/", "/"), RoutePath::NoActionSegment);
    }

    #[test]
    fn test_parse_route_path_with_base() {
        assert_eq!(
            parse_route_path("/test/ct/say-hello", "/test/"),
            RoutePath::Target {
                key: "/ct".to_string(),
                token: "say-hello"
            }
        );
        assert_eq!(parse_route_path("/test", "/test/"), RoutePath::OutsideBaseUrl);
        assert_eq!(parse_route_path("/other/ct/x", "/test/"), RoutePath::OutsideBaseUrl);
        assert_eq!(parse_route_path("/testing/ct/x", "/test/"), RoutePath::OutsideBaseUrl);
    }

    #[test]
    fn test_parse_route_path_collapses_slashes_in_key() {
        assert_eq!(
            parse_route_path("/a//b/go", "/"),
            RoutePath::Target {
                key: "/a/b".to_string(),
                token: "go"
            }
        );
    }

    #[test]
    fn test_parse_route_path_keeps_non_ascii() {
        assert_eq!(
            parse_route_path("/café/say-hello", "/"),
            RoutePath::Target {
                key: "/café".to_string(),
                token: "say-hello"
            }
        );
    }

    #[test]
    fn test_miss_messages() {
        let miss = RouteMiss::ActionNotFound {
            key: "/ct".to_string(),
            action: "ByeAction".to_string(),
        };
        assert_eq!(miss.to_string(), "controller /ct has no ByeAction");
    }
}
