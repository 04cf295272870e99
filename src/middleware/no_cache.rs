use poem::{
    http::{header, HeaderValue},
    Endpoint, IntoResponse, Request, Response, Result,
};
use tracing::debug;

pub struct NoCacheEndpoint<E>(pub E);

impl<E: Endpoint> Endpoint for NoCacheEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        // errors need the headers too
        let mut resp = match self.0.call(req).await {
            Ok(resp) => resp.into_response(),
            Err(err) => {
                debug!("error: {err}");
                err.into_response()
            }
        };

        let headers = resp.headers_mut();
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

        Ok(resp)
    }
}
