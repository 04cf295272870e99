pub mod housekeeping;
pub mod no_cache;

use poem::{Endpoint, Middleware};

use crate::config::Config;

/// Stops browsers and proxies from caching any response.
pub struct NoCache;

impl<E: Endpoint> Middleware<E> for NoCache {
    type Output = no_cache::NoCacheEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        no_cache::NoCacheEndpoint(ep)
    }
}

/// Runs directory housekeeping before every request it wraps, whether or
/// not the request itself is accepted.
pub struct Housekeeping {
    config: Config,
}

impl Housekeeping {
    pub fn new(config: &Config) -> Self {
        Housekeeping {
            config: config.clone(),
        }
    }
}

impl<E: Endpoint> Middleware<E> for Housekeeping {
    type Output = housekeeping::HousekeepingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        housekeeping::HousekeepingEndpoint {
            inner: ep,
            config: self.config.clone(),
        }
    }
}
