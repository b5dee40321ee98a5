use std::time::Duration;

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    pub channel_id: String,
    pub read_api_key: Option<String>,
    #[envconfig(default = "https://api.thingspeak.com")]
    pub api_base_url: String,
    #[envconfig(default = "5")]
    pub feed_results: u32,
    #[envconfig(default = "10")]
    pub poll_interval_secs: u64,
    #[envconfig(default = "10")]
    pub request_timeout_secs: u64,
    pub max_polls: Option<u64>,
}

impl Config {
    /// Read key, with an empty value treated the same as an unset one.
    pub fn api_key(&self) -> Option<&str> {
        self.read_api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
