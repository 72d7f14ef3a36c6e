use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;

// Per-call deadlines are set on each request; this only bounds stray calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_http_client() -> &'static Client {
    &HTTP_CLIENT
}
