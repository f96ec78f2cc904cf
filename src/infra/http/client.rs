//! reqwest adapter for the MapFish print service.

use std::str::FromStr;

use async_trait::async_trait;
use mapprint_api_types::{JobStatus, PrintRequest, SubmitResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::{BackendError, PrintBackend, ReportSubmission};

pub const DEFAULT_PRINT_ORIGIN: &str = "http://localhost:8080";

/// How the request document is written into the POST body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    /// Percent-encoded JSON text, as the print UI has always sent it.
    #[default]
    UrlEncoded,
    Json,
}

impl FromStr for BodyEncoding {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "url_encoded" | "urlencoded" => Ok(Self::UrlEncoded),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown body encoding `{other}`")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PrintClient {
    client: Client,
    origin: Url,
    encoding: BodyEncoding,
}

impl PrintClient {
    pub fn new(origin: &str, encoding: BodyEncoding) -> Result<Self, BackendError> {
        let origin = Url::parse(origin)
            .and_then(|url| url.join("/"))
            .map_err(|err| BackendError::InvalidUrl(format!("{origin}: {err}")))?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(BackendError::transport)?;
        Ok(Self {
            client,
            origin,
            encoding,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("mapprint/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.origin
            .join(path)
            .map_err(|err| BackendError::InvalidUrl(format!("{path}: {err}")))
    }

    /// `{origin}/print/print/{app}/report.{format}` with a lowercase format.
    pub fn report_url(&self, app_id: &str, format: &str) -> Result<Url, BackendError> {
        self.url(&format!(
            "print/print/{app_id}/report.{}",
            format.to_lowercase()
        ))
    }

    pub fn encode_body(&self, request: &PrintRequest) -> Result<String, BackendError> {
        encode_body(request, self.encoding)
    }

    /// Fetch a finished document.
    pub async fn download(&self, url: Url) -> Result<Vec<u8>, BackendError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(BackendError::transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(BackendError::transport)?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(BackendError::transport)?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(BackendError::decode)
    }
}

pub fn encode_body(request: &PrintRequest, encoding: BodyEncoding) -> Result<String, BackendError> {
    let json = serde_json::to_string(request).map_err(BackendError::decode)?;
    Ok(match encoding {
        BodyEncoding::UrlEncoded => urlencoding::encode(&json).into_owned(),
        BodyEncoding::Json => json,
    })
}

#[async_trait]
impl PrintBackend for PrintClient {
    async fn submit(
        &self,
        submission: ReportSubmission<'_>,
    ) -> Result<SubmitResponse, BackendError> {
        let url = self.report_url(submission.app_id, submission.format)?;
        let body = self.encode_body(submission.request)?;
        debug!(%url, bytes = body.len(), "posting print request");

        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(BackendError::transport)?;
        Self::handle(resp).await
    }

    async fn status(&self, status_path: &str) -> Result<JobStatus, BackendError> {
        let url = self.url(status_path)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(BackendError::transport)?;
        Self::handle(resp).await
    }

    fn resolve(&self, path: &str) -> Result<Url, BackendError> {
        self.url(path)
    }
}

#[cfg(test)]
mod tests {
    use mapprint_api_types::{Attributes, MapAttributes, PRINT_DPI};

    use super::*;

    fn request() -> PrintRequest {
        PrintRequest {
            layout: "map only".to_string(),
            output_format: "PDF".to_string(),
            dpi: PRINT_DPI,
            attributes: Attributes {
                title: Some("Lakes & rivers".to_string()),
                description: None,
                map: MapAttributes {
                    center: [1.0, 2.0],
                    projection: "EPSG:3857".to_string(),
                    scale: 5000.0,
                    longitude_first: true,
                    rotation: 0.0,
                    dpi: PRINT_DPI,
                    layers: Vec::new(),
                },
                overview: None,
                legend: None,
                scale_bar: None,
                scale: None,
            },
        }
    }

    #[test]
    fn report_url_lowercases_format_and_drops_origin_path() {
        let client = PrintClient::new("http://localhost:8080/app/", BodyEncoding::default())
            .expect("client");
        let url = client
            .report_url("letter_portrait_overview", "PDF")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/print/print/letter_portrait_overview/report.pdf"
        );
    }

    #[test]
    fn relative_paths_resolve_against_origin() {
        let client =
            PrintClient::new("https://print.example.com", BodyEncoding::Json).expect("client");
        let url = client.resolve("/print/print/status/abc.json").expect("url");
        assert_eq!(url.as_str(), "https://print.example.com/print/print/status/abc.json");
    }

    #[test]
    fn url_encoded_body_decodes_back_to_request() {
        let body = encode_body(&request(), BodyEncoding::UrlEncoded).expect("body");
        assert!(!body.contains('{'));
        assert!(!body.contains(' '));
        let decoded = urlencoding::decode(&body).expect("decode");
        let parsed: PrintRequest = serde_json::from_str(&decoded).expect("json");
        assert_eq!(parsed, request());
    }

    #[test]
    fn json_body_is_plain() {
        let body = encode_body(&request(), BodyEncoding::Json).expect("body");
        assert!(body.starts_with("{\"layout\":\"map only\""));
    }

    #[test]
    fn body_encoding_parses_config_names() {
        assert_eq!("json".parse::<BodyEncoding>(), Ok(BodyEncoding::Json));
        assert_eq!(
            "URL_ENCODED".parse::<BodyEncoding>(),
            Ok(BodyEncoding::UrlEncoded)
        );
        assert!("form".parse::<BodyEncoding>().is_err());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let err = PrintClient::new("not a url", BodyEncoding::Json).expect_err("invalid");
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }
}
