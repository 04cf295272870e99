use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod algorithm;

pub static ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "svg"];

pub const MAX_DIMENSION: u32 = 10_000;

const MAX_FILENAME_LEN: usize = 255;

const RESIZED_SUFFIX: &str = "resized_";

// stem + "resized_.jpeg" must still be a legal filename
const MAX_STEM_LEN: usize = MAX_FILENAME_LEN - RESIZED_SUFFIX.len() - ".jpeg".len();

/// Lowercased text after the last `.`, if any.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_svg(filename: &str) -> bool {
    extension(filename).as_deref() == Some("svg")
}

/// Reduces a client supplied filename to a safe basename.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let name = cleaned.trim_matches(|c| c == '.' || c == '_');

    // ascii only, any byte index is a char boundary
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            let stem = &stem[..stem.len().min(MAX_STEM_LEN)];
            format!("{}.{}", stem, ext)
        }
        None => name[..name.len().min(MAX_STEM_LEN)].to_string(),
    }
}

/// `photo.png` -> `photoresized_.jpeg`
pub fn resized_file_name(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    format!("{}{}.jpeg", stem, RESIZED_SUFFIX)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DimensionError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a whole number, got {1:?}")]
    NotANumber(&'static str, String),

    #[error("{0} must be between 1 and {max}, got {1}", max = MAX_DIMENSION)]
    OutOfRange(&'static str, i64),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
}

impl ResizeRequest {
    pub fn parse(width: Option<&str>, height: Option<&str>) -> Result<Self, DimensionError> {
        Ok(ResizeRequest {
            width: parse_dimension("width", width)?,
            height: parse_dimension("height", height)?,
        })
    }
}

fn parse_dimension(field: &'static str, raw: Option<&str>) -> Result<u32, DimensionError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let raw = raw.ok_or(DimensionError::Missing(field))?;

    let value = raw
        .parse::<i64>()
        .map_err(|_| DimensionError::NotANumber(field, raw.to_string()))?;

    if value < 1 || value > MAX_DIMENSION as i64 {
        return Err(DimensionError::OutOfRange(field, value));
    }

    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist_is_case_insensitive() {
        for name in [
            "a.png", "a.jpg", "a.jpeg", "a.bmp", "a.gif", "a.svg", "a.PNG", "b.JpEg",
        ] {
            assert!(allowed_file(name), "{name}");
        }
    }

    #[test]
    fn other_extensions_are_rejected() {
        for name in ["a.txt", "a.png.exe", "png", "a.", "", "a.webp", "a.tiff"] {
            assert!(!allowed_file(name), "{name}");
        }
    }

    #[test]
    fn sanitize_strips_directories_and_unsafe_chars() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.jpg"), "cat.jpg");
        assert_eq!(sanitize_filename("my photo.png"), "my_photo.png");
        assert_eq!(sanitize_filename("test<script>.png"), "testscript.png");
        assert_eq!(sanitize_filename("..hidden.gif"), "hidden.gif");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn sanitize_truncates_long_names_but_keeps_extension() {
        let long = "a".repeat(300) + ".png";
        let name = sanitize_filename(&long);

        assert_eq!(name, "a".repeat(MAX_STEM_LEN) + ".png");
        assert!(allowed_file(&name));
        assert_eq!(resized_file_name(&name).len(), MAX_FILENAME_LEN);
    }

    #[test]
    fn sanitize_truncates_long_names_without_extension() {
        assert_eq!(sanitize_filename(&"b".repeat(400)).len(), MAX_STEM_LEN);
    }

    #[test]
    fn resized_name_replaces_last_extension() {
        assert_eq!(resized_file_name("photo.png"), "photoresized_.jpeg");
        assert_eq!(resized_file_name("a.b.gif"), "a.bresized_.jpeg");
        assert_eq!(resized_file_name("noext"), "noextresized_.jpeg");
    }

    #[test]
    fn dimensions_parse() {
        assert_eq!(
            ResizeRequest::parse(Some("100"), Some(" 50 ")),
            Ok(ResizeRequest {
                width: 100,
                height: 50
            })
        );
    }

    #[test]
    fn dimensions_reject_bad_input() {
        assert_eq!(
            ResizeRequest::parse(None, Some("1")),
            Err(DimensionError::Missing("width"))
        );
        assert_eq!(
            ResizeRequest::parse(Some("1"), Some("")),
            Err(DimensionError::Missing("height"))
        );
        assert_eq!(
            ResizeRequest::parse(Some("abc"), Some("1")),
            Err(DimensionError::NotANumber("width", "abc".to_string()))
        );
        assert_eq!(
            ResizeRequest::parse(Some("0"), Some("1")),
            Err(DimensionError::OutOfRange("width", 0))
        );
        assert_eq!(
            ResizeRequest::parse(Some("1"), Some("-5")),
            Err(DimensionError::OutOfRange("height", -5))
        );
        assert_eq!(
            ResizeRequest::parse(Some("10001"), Some("1")),
            Err(DimensionError::OutOfRange("width", 10001))
        );
    }

    #[test]
    fn svg_detection() {
        assert!(is_svg("logo.SVG"));
        assert!(!is_svg("logo.png"));
    }
}
