//! Static file server with clean URLs and custom 404 pages

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::site::validate_site_name;

/// Custom not-found page looked up in a site's output root
pub const NOT_FOUND_PAGE: &str = "404.html";

/// Where requests are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoot {
    /// Every request is served from one site's output directory
    Single(PathBuf),
    /// The first path segment names a site under the public directory
    Multi(PathBuf),
}

/// Server state
struct ServerState {
    root: SiteRoot,
}

/// Build the request router
pub fn router(root: SiteRoot) -> Router {
    let state = Arc::new(ServerState { root });
    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until the process is stopped
pub async fn start(root: SiteRoot, addr: &str) -> Result<()> {
    let served = match &root {
        SiteRoot::Single(dir) => format!("site at {}", dir.display()),
        SiteRoot::Multi(dir) => format!("all sites under {}", dir.display()),
    };
    let app = router(root);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to start server on {}", addr))?;

    println!("Server running at http://{} (serving {})", addr, served);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Resolve a request against the site output directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
) -> Response {
    let original_path = request.uri().path().to_string();

    let (site_root, rest) = match &state.root {
        SiteRoot::Single(root) => (root.clone(), original_path.clone()),
        SiteRoot::Multi(public_dir) => match split_site(&original_path) {
            Ok((site, rest)) => (public_dir.join(site), rest.to_string()),
            Err(message) => {
                tracing::debug!("Rejected request {}: {}", original_path, message);
                return (StatusCode::BAD_REQUEST, message).into_response();
            }
        },
    };

    if !site_root.exists() {
        return not_found();
    }

    if let Some(candidate) = resolve(&site_root, &rest) {
        if let Ok(metadata) = tokio::fs::metadata(&candidate).await {
            if metadata.is_dir() && !original_path.ends_with('/') {
                return redirect(&format!("{}/", original_path));
            }

            let rest = if rest.is_empty() { "/" } else { rest.as_str() };
            if let Err(e) = rewrite_path(&mut request, rest) {
                tracing::warn!("Failed to rewrite request path {}: {}", original_path, e);
                return not_found();
            }
            let mut service = ServeDir::new(&site_root);
            return match service.try_call(request).await {
                // directory without an index.html
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    custom_not_found(&site_root).await
                }
                Ok(response) => response.into_response(),
                Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
            };
        }

        let mut with_html = OsString::from(candidate.as_os_str());
        with_html.push(".html");
        let with_html = PathBuf::from(with_html);
        if is_file(&with_html).await {
            return match ServeFile::new(&with_html).oneshot(request).await {
                Ok(response) => response.into_response(),
                Err(infallible) => match infallible {},
            };
        }
    }

    custom_not_found(&site_root).await
}

/// Split `/<site>/<rest>` into the decoded site name and the raw remainder
fn split_site(path: &str) -> Result<(String, &str), String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (segment, rest) = match trimmed.find('/') {
        Some(i) => trimmed.split_at(i),
        None => (trimmed, ""),
    };

    let site = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| "Invalid site name".to_string())?
        .into_owned();
    validate_site_name(&site).map_err(|e| format!("Invalid site name: {}", e))?;
    Ok((site, rest))
}

/// Map a raw URL path to a path under `root`.
/// `None` when a segment could step outside the root.
fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        let decoded = percent_decode_str(segment).decode_utf8().ok()?;
        if decoded == "." || decoded == ".." || decoded.contains('/') || decoded.contains('\\') {
            return None;
        }
        path.push(&*decoded);
    }
    Some(path)
}

/// Point the request at a site-relative path, keeping the query
fn rewrite_path(request: &mut Request<Body>, path: &str) -> Result<(), axum::http::Error> {
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    *request.uri_mut() = Uri::builder().path_and_query(path_and_query).build()?;
    Ok(())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

fn redirect(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Serve the site's `404.html` when it has one
async fn custom_not_found(site_root: &Path) -> Response {
    let page = site_root.join(NOT_FOUND_PAGE);
    if !is_file(&page).await {
        return not_found();
    }

    match tokio::fs::read(&page).await {
        Ok(content) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}", page, e);
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
