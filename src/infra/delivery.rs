//! Document sinks: where a finished print ends up.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::application::ports::{BackendError, Delivery, DocumentSink};
use crate::infra::http::PrintClient;

/// Downloads the document and writes it to `path`.
#[derive(Debug, Clone)]
pub struct FileSink {
    client: PrintClient,
    path: PathBuf,
}

impl FileSink {
    pub fn new(client: PrintClient, path: PathBuf) -> Self {
        Self { client, path }
    }
}

#[async_trait]
impl DocumentSink for FileSink {
    async fn deliver(&self, url: Url) -> Result<Delivery, BackendError> {
        let bytes = self.client.download(url.clone()).await?;
        tokio::fs::write(&self.path, &bytes)
            .await
            .map_err(|err| BackendError::Io(format!("{}: {err}", self.path.display())))?;
        info!(path = %self.path.display(), bytes = bytes.len(), "document saved");
        Ok(Delivery::Saved {
            url,
            path: self.path.clone(),
            bytes: bytes.len(),
        })
    }
}

/// Leaves the document on the print service and hands back its link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkSink;

#[async_trait]
impl DocumentSink for LinkSink {
    async fn deliver(&self, url: Url) -> Result<Delivery, BackendError> {
        info!(%url, "document ready");
        Ok(Delivery::Linked { url })
    }
}
