//! Server and API key preflight checks.

use super::CheckResult;
use crate::models::config::ServerConfig;
use crate::services::OverseerrClient;
use crate::Error;

/// Check the server answers and accepts the API key.
pub async fn check(server: &ServerConfig) -> Vec<CheckResult> {
    let client = match OverseerrClient::from_server_config(server) {
        Ok(client) => client,
        Err(Error::ServerNotConfigured) => {
            return vec![CheckResult::fail(
                "Server",
                "URL not configured",
                "Set SEERR_URL or [server].url in config.toml",
            )]
        }
        Err(e) => {
            return vec![CheckResult::fail(
                "Server",
                &e.to_string(),
                "Use a full URL such as https://requests.example.com",
            )]
        }
    };

    let mut results = Vec::new();
    match client.server_status().await {
        Ok(status) => results.push(CheckResult::ok(
            "Server",
            &format!("{} (version {})", client.base_url(), status.version),
        )),
        Err(e) => {
            results.push(CheckResult::fail(
                "Server",
                &format!("unreachable: {}", e),
                "Check the URL and your network connection",
            ));
            return results;
        }
    }

    if server.api_key.is_none() {
        results.push(CheckResult::fail(
            "API key",
            "not configured",
            "Set SEERR_API_KEY or [server].api_key in config.toml",
        ));
        return results;
    }

    results.push(match client.verify_api_key().await {
        Ok(true) => CheckResult::ok("API key", "accepted"),
        Ok(false) => CheckResult::fail(
            "API key",
            "rejected by the server",
            "Copy the key from Settings > General in the web UI",
        ),
        Err(_) => CheckResult::fail(
            "API key",
            "could not be verified",
            "Check your network connection",
        ),
    });

    results
}
