use std::env;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nivesh::api::run_http_server;
use nivesh::data::MarketDataClient;

#[derive(Parser, Debug)]
#[command(
    name = "nivesh",
    about = "Financial calculator and market-table JSON API"
)]
struct Cli {
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Market-data backend base URL; falls back to NIVESH_BACKEND_URL.
    #[arg(long)]
    backend_url: Option<String>,

    /// Bearer token for the market-data backend; falls back to
    /// NIVESH_BACKEND_TOKEN.
    #[arg(long)]
    backend_token: Option<String>,
}

fn resolve(flag_value: Option<String>, flag: &str, var: &str) -> Result<String, String> {
    flag_value
        .or_else(|| env::var(var).ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing backend configuration; set --{flag} or {var}"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let backend_url = match resolve(cli.backend_url, "backend-url", "NIVESH_BACKEND_URL") {
        Ok(url) => url,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    let backend_token = match resolve(cli.backend_token, "backend-token", "NIVESH_BACKEND_TOKEN") {
        Ok(token) => token,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let client = MarketDataClient::new(backend_url, backend_token);
    if let Err(e) = run_http_server(cli.port, client).await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_the_flag_value() {
        let value = resolve(
            Some("https://example.test".to_string()),
            "backend-url",
            "NIVESH_BACKEND_URL",
        )
        .expect("flag value wins");
        assert_eq!(value, "https://example.test");
    }

    #[test]
    fn resolve_names_both_flag_and_var_when_missing() {
        let err = resolve(None, "backend-token", "NIVESH_TEST_UNSET_VAR")
            .expect_err("nothing configured");
        assert!(err.contains("--backend-token"));
        assert!(err.contains("NIVESH_TEST_UNSET_VAR"));
    }

    #[test]
    fn resolve_treats_empty_values_as_missing() {
        let err = resolve(
            Some(String::new()),
            "backend-url",
            "NIVESH_TEST_UNSET_VAR",
        )
        .expect_err("empty is missing");
        assert!(err.contains("--backend-url"));
    }
}
