use canvas::doc::SnapshotError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status} for {url}: {body}")]
    Server { status: u16, url: String, body: String },
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
}
