use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 33507;

// 20MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

// KB, 200MB
pub const DEFAULT_DIR_LIMIT_KB: u64 = 200 * 1024;

pub const DEFAULT_FILE_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub upload_dir_limit_kb: u64,
    pub download_dir_limit_kb: u64,
    pub file_ttl: Duration,
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("uploads"),
            download_dir: PathBuf::from("downloads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir_limit_kb: DEFAULT_DIR_LIMIT_KB,
            download_dir_limit_kb: DEFAULT_DIR_LIMIT_KB,
            file_ttl: Duration::from_secs(DEFAULT_FILE_TTL_SECS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            port: parse_var("PORT", env::var("PORT").ok(), defaults.port)?,
            upload_dir: env::var_os("IMGRES_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            download_dir: env::var_os("IMGRES_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            max_upload_bytes: parse_var(
                "IMGRES_MAX_UPLOAD_BYTES",
                env::var("IMGRES_MAX_UPLOAD_BYTES").ok(),
                defaults.max_upload_bytes,
            )?,
            upload_dir_limit_kb: parse_var(
                "IMGRES_UPLOAD_DIR_LIMIT_KB",
                env::var("IMGRES_UPLOAD_DIR_LIMIT_KB").ok(),
                defaults.upload_dir_limit_kb,
            )?,
            download_dir_limit_kb: parse_var(
                "IMGRES_DOWNLOAD_DIR_LIMIT_KB",
                env::var("IMGRES_DOWNLOAD_DIR_LIMIT_KB").ok(),
                defaults.download_dir_limit_kb,
            )?,
            file_ttl: Duration::from_secs(parse_var(
                "IMGRES_FILE_TTL_SECS",
                env::var("IMGRES_FILE_TTL_SECS").ok(),
                DEFAULT_FILE_TTL_SECS,
            )?),
            session_ttl: Duration::from_secs(parse_var(
                "IMGRES_SESSION_TTL_SECS",
                env::var("IMGRES_SESSION_TTL_SECS").ok(),
                DEFAULT_SESSION_TTL_SECS,
            )?),
        })
    }

    /// Creates the upload and download directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.download_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory {}", dir.display()))?;
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_uses_default() {
        assert_eq!(parse_var("PORT", None, DEFAULT_PORT).unwrap(), 33507);
    }

    #[test]
    fn present_var_is_parsed() {
        assert_eq!(
            parse_var("PORT", Some(" 8080 ".to_string()), DEFAULT_PORT).unwrap(),
            8080
        );
    }

    #[test]
    fn garbage_var_is_an_error() {
        let err = parse_var("PORT", Some("eighty".to_string()), DEFAULT_PORT).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn ensure_dirs_creates_both() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            upload_dir: root.path().join("up"),
            download_dir: root.path().join("down"),
            ..Config::default()
        };

        config.ensure_dirs().unwrap();

        assert!(config.upload_dir.is_dir());
        assert!(config.download_dir.is_dir());
    }
}
