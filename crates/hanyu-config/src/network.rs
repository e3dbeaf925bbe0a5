use std::env;

use serde::{Deserialize, Serialize};

fn default_ws_url() -> String {
    "ws://localhost:8080".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// WebSocket of the in-page bridge script
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Capacity of the background request channel
    pub request_queue: usize,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let ws_url = env::var("WS_URL").unwrap_or_else(|_| default_ws_url());

        Self {
            ws_url,
            request_queue: 64,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            request_queue: 64,
        }
    }
}
