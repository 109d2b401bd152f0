//! REST client for the book canvas backend.
//!
//! The backend stores one [`Snapshot`] per book and exchanges it wholesale:
//! `GET {base}/books/{book_id}/canvas` returns it and `PUT` replaces it.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use canvas::doc::Snapshot;

use crate::error::CliError;

pub struct BookClient {
    http: reqwest::Client,
    base_url: String,
}

impl BookClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn canvas_url(&self, book_id: &str) -> String {
        format!("{}/books/{}/canvas", self.base_url, book_id)
    }

    /// Fetch the saved canvas for a book.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx responses, or an invalid snapshot body.
    pub async fn pull(&self, book_id: &str) -> Result<Snapshot, CliError> {
        let url = self.canvas_url(book_id);
        tracing::debug!(%url, "fetching canvas");
        let response = self.http.get(&url).send().await?;
        let body = checked_body(response, &url).await?;
        Ok(Snapshot::from_json(&body)?)
    }

    /// Replace the saved canvas for a book.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or non-2xx responses.
    pub async fn push(&self, book_id: &str, snapshot: &Snapshot) -> Result<(), CliError> {
        let url = self.canvas_url(book_id);
        tracing::debug!(%url, shapes = snapshot.shape_elements.len(), arrows = snapshot.curve_elements.len(), "saving canvas");
        let response = self.http.put(&url).json(snapshot).send().await?;
        checked_body(response, &url).await?;
        Ok(())
    }
}

async fn checked_body(response: reqwest::Response, url: &str) -> Result<String, CliError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), url: url.to_owned(), body });
    }
    Ok(body)
}
