use poem::{http::StatusCode, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::core::{DimensionError, ResizeRequest};

pub mod download;
pub mod pages;
pub mod params;
pub mod resize;
pub mod upload;


/// Session key of the [`SessionRecord`].
pub const SESSION_KEY: &str = "upload";

/// What one browser session has uploaded and resized so far.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub filename: String,
    pub resize: ResizeRequest,
    pub resized: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed upload: {0}")]
    Multipart(String),

    #[error("no file uploaded")]
    MissingFile,

    #[error("filename {0:?} has no usable characters")]
    BadFilename(String),

    #[error("file type of {0:?} is not allowed, expected one of png, jpg, jpeg, bmp, gif, svg")]
    FileTypeNotAllowed(String),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error("upload an image first")]
    NoUpload,

    #[error("svg images cannot be rasterized")]
    Svg,

    #[error("uploaded image {0:?} is no longer available")]
    SourceMissing(String),

    #[error("cannot decode image: {0}")]
    Decode(String),

    #[error("nothing to download")]
    NothingToDownload,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Multipart(_)
            | ApiError::MissingFile
            | ApiError::BadFilename(_)
            | ApiError::Dimension(_) => StatusCode::BAD_REQUEST,
            ApiError::FileTypeNotAllowed(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::NoUpload => StatusCode::CONFLICT,
            ApiError::Svg | ApiError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SourceMissing(_) | ApiError::NothingToDownload => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{:?}", self);
            // internals stay in the log
            return Response::builder().status(status).finish();
        }

        warn!("{}", self);
        Response::builder().status(status).body(self.to_string())
    }
}
