use std::io::ErrorKind;

use poem::{
    handler, http::header, session::Session, web::Data, Body, IntoResponse, Response,
};
use tracing::info;

use crate::{
    api::{ApiError, SessionRecord, SESSION_KEY},
    config::Config,
};

#[handler]
pub async fn download(session: &Session, Data(config): Data<&Config>) -> Response {
    match handle(session, config).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

async fn handle(session: &Session, config: &Config) -> Result<Response, ApiError> {
    let name = session
        .get::<SessionRecord>(SESSION_KEY)
        .and_then(|record| record.resized)
        .ok_or(ApiError::NothingToDownload)?;

    let path = config.download_dir.join(&name);

    let buffer = match tokio::fs::read(&path).await {
        Ok(buffer) => buffer,
        // wiped by housekeeping
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ApiError::NothingToDownload),
        Err(e) => return Err(anyhow::Error::from(e).into()),
    };

    info!("serving {} ({} bytes)", name, buffer.len());

    Ok(Response::builder()
        .content_type("image/jpeg")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        )
        .body(Body::from_vec(buffer)))
}
