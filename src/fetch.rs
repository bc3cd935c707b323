use std::time::Duration;

use log::debug;

use crate::errors::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("valhalla_nodes/", env!("CARGO_PKG_VERSION"));

/// Retrieves a page as text. Failures are final; callers do not retry.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP GET with a per-request timeout.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        HttpFetcher { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        HttpFetcher::new(DEFAULT_TIMEOUT)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!(url = url; "GET");
        // ureq reports 4xx/5xx as `Error::Status`.
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| Error::fetch(url, err))?;
        response
            .into_string()
            .map_err(|err| Error::fetch(url, err))
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;

    use super::Fetch;
    use crate::errors::{Error, Result};

    /// Serves canned bodies by URL; anything else fails like a 404.
    #[derive(Default)]
    pub struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl FakeFetcher {
        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| Error::fetch(url, "status code 404"))
        }
    }
}
