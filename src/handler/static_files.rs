//! Static file serving module
//!
//! Serves files under a root directory, with index files for directories,
//! `ETag` revalidation and HEAD support.

use hyper::header::IF_NONE_MATCH;
use hyper::{Method, Request, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use super::{Handler, HandlerFuture};
use crate::http::{self, cache, mime, Body};
use crate::logger;

const DEFAULT_INDEX_FILES: &[&str] = &["index.html"];

/// Handler serving files below `root`, keyed by the request path
#[derive(Clone)]
pub struct FileServer {
    root: Arc<PathBuf>,
    index_files: Arc<[String]>,
}

impl FileServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
            index_files: DEFAULT_INDEX_FILES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Handler for FileServer {
    fn call(&self, req: Request<()>) -> HandlerFuture {
        let root = Arc::clone(&self.root);
        let index_files = Arc::clone(&self.index_files);
        Box::pin(async move { serve_file(&root, &index_files, &req).await })
    }
}

async fn serve_file(root: &Path, index_files: &[String], req: &Request<()>) -> Response<Body> {
    let is_head = req.method() == Method::HEAD;

    let Some((content, content_type)) =
        load_from_directory(root, req.uri().path(), index_files).await
    else {
        return http::build_default_404_response();
    };

    let etag = cache::generate_etag(&content);
    let if_none_match = req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    if cache::is_not_modified(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_file_response(content, content_type, &etag, is_head)
}

/// Load the file `path` names under `root`
///
/// Directories resolve to their first existing index file. Anything that
/// resolves outside `root` is refused.
pub async fn load_from_directory(
    root: &Path,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let relative = path.trim_start_matches('/');
    if relative.split('/').any(|segment| segment == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    let mut file_path = root_canonical.join(relative);
    if is_dir(&file_path).await {
        let mut index = None;
        for name in index_files {
            let candidate = file_path.join(name);
            if is_file(&candidate).await {
                index = Some(candidate);
                break;
            }
        }
        file_path = index?;
    }

    // Missing files are ordinary 404s, not worth a warning
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    match fs::read(&file_canonical).await {
        Ok(content) => Some((content, mime::content_type_for(&file_path))),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            None
        }
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    /// Fresh directory with `index.html`, `app.css` and `docs/readme.txt`
    fn fixture_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rust_dispatcher_static_{}_{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(dir.join("docs")).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(dir.join("app.css"), "body{}").unwrap();
        std::fs::write(dir.join("docs/readme.txt"), "read me").unwrap();
        dir
    }

    fn get(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    async fn body_string(resp: Response<Body>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_with_content_type() {
        let server = FileServer::new(fixture_dir());
        let resp = server.call(get("/app.css")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/css; charset=utf-8");
        assert!(resp.headers().contains_key("etag"));
        assert_eq!(body_string(resp).await, "body{}");
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let server = FileServer::new(fixture_dir());
        let resp = server.call(get("/")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_404() {
        let server = FileServer::new(fixture_dir());
        let resp = server.call(get("/docs/")).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_missing_file_and_traversal_are_404() {
        let server = FileServer::new(fixture_dir());
        assert_eq!(server.call(get("/nope.txt")).await.status(), 404);
        assert_eq!(server.call(get("/docs/../../etc/passwd")).await.status(), 404);
    }

    #[tokio::test]
    async fn test_etag_revalidation() {
        let server = FileServer::new(fixture_dir());
        let first = server.call(get("/docs/readme.txt")).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/docs/readme.txt")
            .header("If-None-Match", etag)
            .body(())
            .unwrap();
        let resp = server.call(req).await;
        assert_eq!(resp.status(), 304);
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let server = FileServer::new(fixture_dir());
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/app.css")
            .body(())
            .unwrap();
        let resp = server.call(req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "6");
        assert_eq!(body_string(resp).await, "");
    }
}
