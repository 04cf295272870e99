use std::{io::ErrorKind, path::Path};

use bytes::Bytes;
use image::ImageReader;
use poem::{handler, session::Session, web::Data, IntoResponse, Response};
use tracing::info;

use crate::{
    api::{pages, ApiError, SessionRecord, SESSION_KEY},
    config::Config,
    core::{algorithm, is_svg, resized_file_name, ResizeRequest},
    storage::file::{size_kb, write_atomic},
};

#[handler]
pub async fn resize(session: &Session, Data(config): Data<&Config>) -> Response {
    match handle(session, config).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

async fn handle(session: &Session, config: &Config) -> Result<Response, ApiError> {
    let mut record = session
        .get::<SessionRecord>(SESSION_KEY)
        .ok_or(ApiError::NoUpload)?;

    if is_svg(&record.filename) {
        return Err(ApiError::Svg);
    }

    let src_path = config.upload_dir.join(&record.filename);
    let resized_name = resized_file_name(&record.filename);

    let buf = {
        let src_path = src_path.clone();
        let filename = record.filename.clone();
        let ResizeRequest { width, height } = record.resize;

        tokio::task::spawn_blocking(move || transform(&src_path, &filename, width, height))
            .await
            .map_err(anyhow::Error::from)??
    };

    let dst_path = write_atomic(&config.download_dir, &resized_name, &buf).await?;

    let original_kb = size_kb(&src_path)
        .await
        .map_err(|_| ApiError::SourceMissing(record.filename.clone()))?;
    let resized_kb = size_kb(&dst_path).await?;

    info!(
        "resized {} to {}x{} -> {} ({}KB -> {}KB)",
        record.filename,
        record.resize.width,
        record.resize.height,
        resized_name,
        original_kb,
        resized_kb
    );

    record.resized = Some(resized_name);
    session.set(SESSION_KEY, record);

    Ok(pages::resized(original_kb, resized_kb).into_response())
}

fn transform(path: &Path, filename: &str, width: u32, height: u32) -> Result<Bytes, ApiError> {
    let reader = ImageReader::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ApiError::SourceMissing(filename.to_string()),
        _ => ApiError::Internal(e.into()),
    })?;

    let img = reader
        .with_guessed_format()
        .map_err(anyhow::Error::from)?
        .decode()
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(algorithm::resize(&img, width, height)?)
}
