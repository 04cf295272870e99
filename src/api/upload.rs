use poem::{
    handler,
    session::Session,
    web::{Data, Multipart, Redirect},
    IntoResponse, Response,
};
use tracing::info;

use crate::{
    api::{params::upload_params::UploadForm, ApiError, SessionRecord, SESSION_KEY},
    config::Config,
    storage::file::write_atomic,
};

#[handler]
pub async fn upload(multipart: Multipart, session: &Session, Data(config): Data<&Config>) -> Response {
    match handle(multipart, session, config).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

#[handler]
pub fn upload_page() -> Redirect {
    Redirect::see_other("/")
}

async fn handle(multipart: Multipart, session: &Session, config: &Config) -> Result<Response, ApiError> {
    let params = UploadForm::from_multipart(multipart).await?.validate()?;

    let path = write_atomic(&config.upload_dir, &params.filename, &params.data).await?;

    info!(
        "stored {} ({} bytes), requested {}x{}",
        path.display(),
        params.data.len(),
        params.resize.width,
        params.resize.height
    );

    // fresh token for every upload
    session.renew();
    session.set(
        SESSION_KEY,
        SessionRecord {
            filename: params.filename,
            resize: params.resize,
            resized: None,
        },
    );

    Ok(Redirect::see_other("/resize").into_response())
}
