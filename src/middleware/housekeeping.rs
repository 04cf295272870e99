use poem::{Endpoint, IntoResponse, Request, Response, Result};
use tracing::warn;

use crate::{config::Config, storage};

pub struct HousekeepingEndpoint<E> {
    pub(super) inner: E,
    pub(super) config: Config,
}

impl<E: Endpoint> Endpoint for HousekeepingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let config = self.config.clone();
        let r = tokio::task::spawn_blocking(move || run(&config)).await;
        if let Err(e) = r {
            warn!("housekeeping task failed: {:?}", e);
        }

        let resp = self.inner.call(req).await?;
        Ok(resp.into_response())
    }
}

fn run(config: &Config) {
    storage::housekeep_logged(
        &config.upload_dir,
        config.upload_dir_limit_kb,
        config.file_ttl,
    );
    storage::housekeep_logged(
        &config.download_dir,
        config.download_dir_limit_kb,
        config.file_ttl,
    );
}
