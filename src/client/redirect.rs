// File: ./src/client/redirect.rs
use http::{Request, Response, Uri};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;
use url::Url;

/// The URI that actually produced the response, after any redirects.
/// Inserted into the response extensions so relative links can be resolved
/// against the page the content came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalUri(pub Uri);

#[derive(Clone, Debug)]
pub struct FollowRedirectLayer {
    max_redirects: usize,
}

impl FollowRedirectLayer {
    pub fn new(max_redirects: usize) -> Self {
        Self { max_redirects }
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirectService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirectService {
            inner,
            max_redirects: self.max_redirects,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FollowRedirectService<S> {
    inner: S,
    max_redirects: usize,
}

/// Resolves a `Location` header value against the URI of the request that
/// received it. Handles absolute, host-relative and path-relative forms.
pub fn resolve_location(current: &Uri, location: &str) -> Option<Uri> {
    let base = Url::parse(&current.to_string()).ok()?;
    let mut next = base.join(location).ok()?;
    // Fragments are never sent to the server.
    next.set_fragment(None);
    next.as_str().parse::<Uri>().ok()
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for FollowRedirectService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    ReqBody: Clone + Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // The clone that was polled ready is the one that must be called.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let max_redirects = self.max_redirects;

        Box::pin(async move {
            let mut current_req = req;
            let mut hops = 0;

            loop {
                let next_req = current_req.clone();
                let current_uri = current_req.uri().clone();

                let mut response = inner.call(current_req).await?;

                let target = if hops < max_redirects && response.status().is_redirection() {
                    response
                        .headers()
                        .get(http::header::LOCATION)
                        .and_then(|loc| loc.to_str().ok())
                        .and_then(|loc| resolve_location(&current_uri, loc))
                } else {
                    None
                };

                match target {
                    Some(uri) => {
                        log::debug!("Following redirect {} -> {}", current_uri, uri);
                        current_req = next_req;
                        *current_req.uri_mut() = uri;
                        hops += 1;
                        std::future::poll_fn(|cx| inner.poll_ready(cx)).await?;
                    }
                    None => {
                        response.extensions_mut().insert(FinalUri(current_uri));
                        return Ok(response);
                    }
                }
            }
        })
    }
}
