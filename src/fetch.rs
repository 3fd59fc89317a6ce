use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::debug;

use crate::errors::{ConfigError, FetchError};
use crate::extract::schema::MAIN_COLUMN;
use crate::page::CardPage;

const BASE_URL: &str = "https://imascg-slstage-wiki.gamerch.com";

// The wiki fills the main column in with JS after load; presence of that
// element is the readiness signal, bounded by READY_TIMEOUT.
const READY_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser engine behind the WebDriver endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Chrome,
    Edge,
    Firefox,
}

impl Engine {
    /// Default endpoint of the matching driver binary
    /// (chromedriver/msedgedriver listen on 9515, geckodriver on 4444).
    pub fn default_webdriver_url(self) -> &'static str {
        match self {
            Engine::Chrome | Engine::Edge => "http://localhost:9515",
            Engine::Firefox => "http://localhost:4444",
        }
    }
}

impl FromStr for Engine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Engine::Chrome),
            "edge" => Ok(Engine::Edge),
            "firefox" => Ok(Engine::Firefox),
            _ => Err(ConfigError(s.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Chrome => "chrome",
            Engine::Edge => "edge",
            Engine::Firefox => "firefox",
        })
    }
}

/// Wiki page URL for a request key. Names go in verbatim; the wiki accepts
/// raw UTF-8 paths.
pub fn card_url(query: &str) -> String {
    format!("{}/{}", BASE_URL, query)
}

/// Owns the single browser session for the whole batch. Callers must
/// `close` it on every exit path, early aborts included.
pub struct Fetcher {
    driver: WebDriver,
}

impl Fetcher {
    pub async fn connect(engine: Engine, webdriver_url: &str) -> anyhow::Result<Self> {
        let driver = match engine {
            Engine::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                caps.add_arg("--headless")?;
                WebDriver::new(webdriver_url, caps).await?
            }
            Engine::Edge => {
                let mut caps = DesiredCapabilities::edge();
                caps.add_arg("--headless")?;
                WebDriver::new(webdriver_url, caps).await?
            }
            Engine::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                caps.set_headless()?;
                WebDriver::new(webdriver_url, caps).await?
            }
        };
        Ok(Self { driver })
    }

    /// Navigate to a card page and snapshot it once the async main column
    /// is present. No retries: a page that never renders within the bound
    /// is indistinguishable from one that does not exist.
    pub async fn fetch(&self, query: &str) -> Result<CardPage, FetchError> {
        let url = card_url(query);
        debug!("Fetching {}", url);

        self.driver
            .goto(&url)
            .await
            .map_err(|source| FetchError::WebDriver {
                url: url.clone(),
                source,
            })?;

        self.driver
            .query(By::Css(MAIN_COLUMN))
            .wait(READY_TIMEOUT, POLL_INTERVAL)
            .first()
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.clone(),
                timeout: READY_TIMEOUT,
            })?;

        let source = self
            .driver
            .source()
            .await
            .map_err(|source| FetchError::WebDriver {
                url: url.clone(),
                source,
            })?;

        Ok(CardPage::parse(&source))
    }

    pub async fn close(self) -> anyhow::Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}
