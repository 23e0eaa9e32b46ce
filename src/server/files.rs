use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use tokio::fs;
use warp::{
    http::StatusCode,
    reply::{self, Reply, Response},
};

const INDEX: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeError {
    /// The request tried to climb out of the served directory.
    Forbidden(String),
    NotFound(String),
}

impl ServeError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Self::Forbidden(_) => "<h1>403 Forbidden</h1>".to_owned(),
            Self::NotFound(path) => format!(
                "<h1>404 Not Found</h1><p>File not found: {}</p>",
                escape_html(path)
            ),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Forbidden(path) => write!(f, "forbidden path {path}"),
            Self::NotFound(path) => write!(f, "file not found: {path}"),
        }
    }
}

impl std::error::Error for ServeError {}

impl Reply for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        reply::with_status(reply::html(self.body()), status).into_response()
    }
}

/// Maps a URL path onto a path relative to the served root.
///
/// `/` becomes `index.html`. `.` segments and empty segments are dropped and
/// `..` removes the previous segment; a `..` with nothing left to remove is a
/// traversal attempt.
///
/// # Errors
///
/// [`ServeError::Forbidden`] if the path climbs above the root.
pub fn resolve(url_path: &str) -> Result<PathBuf, ServeError> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in url_path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::Forbidden(url_path.to_owned()));
                }
            }
            segment => segments.push(segment),
        }
    }

    if segments.is_empty() {
        segments.push(INDEX);
    }

    Ok(segments.iter().collect())
}

/// Content type for a file, by lowercase extension.
#[must_use]
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "text/html",
    }
}

/// Reads the file a URL path points at, refusing anything that resolves
/// outside `root` (including through symlinks).
///
/// # Errors
///
/// [`ServeError::Forbidden`] for traversal, [`ServeError::NotFound`] when
/// there is no readable file at the path.
pub async fn load(
    root: &Path,
    url_path: &str,
) -> Result<(Vec<u8>, &'static str), ServeError> {
    let relative = resolve(url_path)?;
    let not_found = || ServeError::NotFound(url_path.to_owned());

    let root = fs::canonicalize(root).await.map_err(|e| {
        warn!("served root {} is unavailable: {e}", root.display());
        not_found()
    })?;
    let file = fs::canonicalize(root.join(&relative))
        .await
        .map_err(|_| not_found())?;

    if !file.starts_with(&root) {
        return Err(ServeError::Forbidden(url_path.to_owned()));
    }

    debug!("serving {}", file.display());
    let bytes = fs::read(&file).await.map_err(|_| not_found())?;

    Ok((bytes, content_type(&relative)))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
