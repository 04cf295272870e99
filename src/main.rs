mod api;
mod config;
mod core;
mod middleware;
mod storage;

use api::{
    download::download,
    pages::index,
    resize::resize,
    upload::{upload, upload_page},
};
use config::Config;
use middleware::{Housekeeping, NoCache};
use poem::{
    get,
    listener::TcpListener,
    middleware::{CatchPanic, SizeLimit, Tracing},
    session::{CookieConfig, MemoryStorage, ServerSession},
    Endpoint, EndpointExt, Route, Server,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const SESSION_COOKIE: &str = "imgres-session";

pub fn build_app(config: Config) -> impl Endpoint {
    let session = ServerSession::new(
        CookieConfig::default()
            .name(SESSION_COOKIE)
            .http_only(true)
            .secure(false)
            .max_age(config.session_ttl),
        MemoryStorage::new(),
    );
    // 413 over the limit, 411 without a Content-Length
    let size_limit = SizeLimit::new(config.max_upload_bytes as usize);

    Route::new()
        .at("/", get(index))
        .at(
            "/upload",
            get(upload_page)
                .post(upload.with(size_limit))
                .with(Housekeeping::new(&config)),
        )
        .at("/resize", get(resize))
        .at("/download", get(download).post(download))
        .with(session)
        .data(config)
        .with(CatchPanic::new())
        .with(NoCache)
        .with(Tracing)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    config.ensure_dirs()?;

    let addr = format!("0.0.0.0:{}", config.port);
    info!(
        "listening on {}, uploads in {}, downloads in {}",
        addr,
        config.upload_dir.display(),
        config.download_dir.display()
    );

    Server::new(TcpListener::bind(addr)).run(build_app(config)).await?;

    Ok(())
}
