// File: ./src/client/fetcher.rs
use crate::client::middleware::{DefaultHeadersLayer, DefaultHeadersService};
use crate::client::page::Page;
use crate::client::redirect::{FinalUri, FollowRedirectLayer, FollowRedirectService};
use crate::config::Config;
use crate::error::FetchError;

use http::{Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};
use url::Url;

const MAX_REDIRECTS: usize = 5;

type HttpsClient = Client<HttpsConnector<HttpConnector>, String>;
type PageService = DefaultHeadersService<FollowRedirectService<HttpsClient>>;

/// Retrieves HTML pages with a bounded per-request timeout. No retries.
#[derive(Clone)]
pub struct PageFetcher {
    service: PageService,
    timeout: Duration,
}

fn native_root_store() -> rustls::RootCertStore {
    let mut root_store = rustls::RootCertStore::empty();
    let result = rustls_native_certs::load_native_certs();
    for err in &result.errors {
        log::debug!("Skipping native certificate source: {}", err);
    }
    root_store.add_parsable_certificates(result.certs);
    if root_store.is_empty() {
        log::warn!("No valid system certificates found; HTTPS requests will fail");
    }
    root_store
}

/// Flattens an error and its sources into one line. hyper's top-level
/// messages ("client error (Connect)") are useless on their own.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

impl PageFetcher {
    pub fn new(config: &Config) -> Self {
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(native_root_store())
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http_client: HttpsClient = Client::builder(TokioExecutor::new()).build(https_connector);

        let service = ServiceBuilder::new()
            .layer(DefaultHeadersLayer::for_html(&config.user_agent))
            .layer(FollowRedirectLayer::new(MAX_REDIRECTS))
            .service(http_client);

        Self {
            service,
            timeout: config.request_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and parse the body as an HTML document.
    pub async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let (final_url, body) = self.fetch_text(url).await?;
        Ok(Page::parse(final_url, &body))
    }

    /// GET `url`, returning the post-redirect URL and the body decoded as
    /// (lossy) UTF-8. Non-2xx responses are errors.
    pub async fn fetch_text(&self, url: &Url) -> Result<(Url, String), FetchError> {
        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|e: http::uri::InvalidUri| FetchError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let request = Request::get(uri)
            .body(String::new())
            .map_err(|e| FetchError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let exchange = async {
            let response = self
                .service
                .clone()
                .oneshot(request)
                .await
                .map_err(|e| FetchError::Transport {
                    url: url.to_string(),
                    reason: error_chain(&e),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let final_url = response
                .extensions()
                .get::<FinalUri>()
                .and_then(|FinalUri(uri)| Url::parse(&uri.to_string()).ok())
                .unwrap_or_else(|| url.clone());

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| FetchError::Body {
                    url: url.to_string(),
                    reason: error_chain(&e),
                })?
                .to_bytes();

            Ok::<_, FetchError>((final_url, String::from_utf8_lossy(&body).into_owned()))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => {
                if let Ok((final_url, body)) = &result {
                    log::debug!("Fetched {} ({} bytes)", final_url, body.len());
                }
                result
            }
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}
