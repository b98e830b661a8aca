//! Page rendering collaborators.
//!
//! `TextPages` answers with literal text. `HtmlFiles` stitches a page
//! together from files on disk:
//!
//! ```text
//! <root>/base.html            outer document, contains {{nav}} and {{content}}
//! <root>/partials/nav.html    substituted for {{nav}}
//! <root>/pages/<page>.html    substituted for {{content}}
//! ```

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown page {0:?}")]
    UnknownPage(String),

    #[error("failed to read template {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Produces the body for a named page.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, page: &str) -> Result<String, RenderError>;
}

/// Built-in literal pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPages;

#[async_trait]
impl PageRenderer for TextPages {
    async fn render(&self, page: &str) -> Result<String, RenderError> {
        match page {
            "home" => Ok("Hello from SnippetBox".to_string()),
            other => Err(RenderError::UnknownPage(other.to_string())),
        }
    }
}

/// Pages assembled from HTML files under a root directory.
#[derive(Debug, Clone)]
pub struct HtmlFiles {
    root: PathBuf,
}

impl HtmlFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

}

async fn read(path: PathBuf) -> Result<String, RenderError> {
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| RenderError::Read { path, source })
}

#[async_trait]
impl PageRenderer for HtmlFiles {
    async fn render(&self, page: &str) -> Result<String, RenderError> {
        let valid = !page.is_empty()
            && page
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RenderError::UnknownPage(page.to_string()));
        }

        let base = read(self.root.join("base.html")).await?;
        let nav = read(self.root.join("partials").join("nav.html")).await?;
        let content = read(self.root.join("pages").join(format!("{page}.html"))).await?;

        Ok(base.replace("{{nav}}", &nav).replace("{{content}}", &content))
    }
}
