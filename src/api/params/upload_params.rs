use poem::web::Multipart;

use crate::{
    api::ApiError,
    core::{allowed_file, sanitize_filename, ResizeRequest},
};

/// Raw fields of the upload form, as sent by the browser.
#[derive(Default, Debug)]
pub struct UploadForm {
    pub filename: Option<String>,
    pub data: Vec<u8>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// A checked upload, ready to be stored.
#[derive(Debug)]
pub struct UploadParams {
    pub filename: String,
    pub data: Vec<u8>,
    pub resize: ResizeRequest,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Multipart(e.to_string()))?
        {
            let name = field.name().map(str::to_string);

            match name.as_deref() {
                Some("file") => {
                    form.filename = field.file_name().map(str::to_string);

                    // the body is already bounded by the route's size limit
                    form.data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::Multipart(e.to_string()))?;
                }
                Some("width") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::Multipart(e.to_string()))?;
                    form.width = Some(text);
                }
                Some("height") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::Multipart(e.to_string()))?;
                    form.height = Some(text);
                }
                _ => continue,
            }
        }

        Ok(form)
    }

    pub fn validate(self) -> Result<UploadParams, ApiError> {
        let raw_name = self
            .filename
            .filter(|n| !n.is_empty())
            .ok_or(ApiError::MissingFile)?;

        let filename = sanitize_filename(&raw_name);
        if filename.is_empty() {
            return Err(ApiError::BadFilename(raw_name));
        }

        if !allowed_file(&filename) {
            return Err(ApiError::FileTypeNotAllowed(filename));
        }

        let resize = ResizeRequest::parse(self.width.as_deref(), self.height.as_deref())?;

        Ok(UploadParams {
            filename,
            data: self.data,
            resize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DimensionError;

    fn form(filename: &str, width: &str, height: &str) -> UploadForm {
        UploadForm {
            filename: Some(filename.to_string()),
            data: vec![1, 2, 3],
            width: Some(width.to_string()),
            height: Some(height.to_string()),
        }
    }

    #[test]
    fn valid_form() {
        let params = form("../my photo.PNG", "100", "50").validate().unwrap();

        assert_eq!(params.filename, "my_photo.PNG");
        assert_eq!(params.data, vec![1, 2, 3]);
        assert_eq!(
            params.resize,
            ResizeRequest {
                width: 100,
                height: 50
            }
        );
    }

    #[test]
    fn missing_file() {
        let err = UploadForm::default().validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingFile));

        let err = form("", "1", "1").validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingFile));
    }

    #[test]
    fn unusable_filename() {
        let err = form("../..", "1", "1").validate().unwrap_err();
        assert!(matches!(err, ApiError::BadFilename(_)));
    }

    #[test]
    fn disallowed_extension() {
        let err = form("notes.txt", "1", "1").validate().unwrap_err();
        assert!(matches!(err, ApiError::FileTypeNotAllowed(ref n) if n == "notes.txt"));
    }

    #[test]
    fn extension_checked_after_sanitizing() {
        // ".png" sanitizes to "png", which has no extension
        let err = form(".png", "1", "1").validate().unwrap_err();
        assert!(matches!(err, ApiError::FileTypeNotAllowed(_)));
    }

    #[test]
    fn bad_dimensions() {
        let err = form("a.png", "0", "10").validate().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Dimension(DimensionError::OutOfRange("width", 0))
        ));
    }
}
