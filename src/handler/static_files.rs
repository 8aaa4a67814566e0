//! Static file serving module
//!
//! Serves the built web client for paths outside the API.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve `path` from `static_dir`, or `None` if there is no such file
pub async fn serve_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
    is_head: bool,
) -> Option<Response<Full<Bytes>>> {
    let (content, content_type) = load_from_directory(static_dir, path, index_files).await?;
    Some(http::build_file_response(content, content_type, is_head))
}

/// Load static file from directory with index file support
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // A missing frontend build is normal for API-only deployments
    let static_dir_canonical = Path::new(static_dir).canonicalize().ok()?;

    let relative_path = path.trim_start_matches('/');
    let mut file_path = static_dir_canonical.join(relative_path);

    // Directory requests resolve to the first existing index file
    if file_path.is_dir() {
        file_path = index_files
            .iter()
            .map(|index| file_path.join(index))
            .find(|candidate| candidate.is_file())?;
    }

    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    fn build_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Notes</h1>").unwrap();
        std::fs::create_dir(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/main.js"), "console.log(1)").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = build_dir();
        let root = dir.path().to_str().unwrap();
        let (content, content_type) = load_from_directory(root, "/", &index()).await.unwrap();
        assert_eq!(content, b"<h1>Notes</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_nested_asset() {
        let dir = build_dir();
        let root = dir.path().to_str().unwrap();
        let (_, content_type) = load_from_directory(root, "/static/main.js", &index())
            .await
            .unwrap();
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_missing_file_and_dir() {
        let dir = build_dir();
        let root = dir.path().to_str().unwrap();
        assert!(load_from_directory(root, "/nope.css", &index()).await.is_none());
        assert!(load_from_directory("/definitely/not/here", "/", &index())
            .await
            .is_none());
        // Directory without an index file
        assert!(load_from_directory(root, "/static/", &index()).await.is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let site = outer.path().join("build");
        std::fs::create_dir(&site).unwrap();

        let root = site.to_str().unwrap();
        assert!(load_from_directory(root, "/../secret.txt", &index())
            .await
            .is_none());
    }
}
