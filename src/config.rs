use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    let api_url = get_env_or_default("NEWSDESK_API_URL", DEFAULT_API_URL);
    Config {
        // the digest front end talks to the origin that served it, which is
        // normally the same service as the desk api.
        digest_url: get_env_or_default("NEWSDESK_DIGEST_URL", &api_url),
        api_url,
        bind_addr: get_env_or_default("NEWSDESK_BIND", DEFAULT_BIND_ADDR),
        static_dir: get_env_or_default("NEWSDESK_STATIC_DIR", "static"),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub digest_url: String,
    pub bind_addr: String,
    pub static_dir: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
