// src/settings.rs
//
// Server settings from environment variables. `dotenvy::dotenv()` is loaded by
// the entrypoint before this runs, so a local `.env` file works in dev.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_host: String,
    pub backend_port: u16,
    /// Origins allowed by CORS, comma-separated in `ALLOWED_ORIGINS`.
    pub allowed_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_host: "0.0.0.0".to_string(),
            backend_port: 8000,
            allowed_origins: vec!["http://localhost:8501".to_string()],
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend_host =
            std::env::var("BACKEND_HOST").unwrap_or(defaults.backend_host);

        let backend_port = match std::env::var("BACKEND_PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "BACKEND_PORT is not a valid port, using default");
                defaults.backend_port
            }),
            Err(_) => defaults.backend_port,
        };

        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(raw) => {
                let parsed = parse_origins(&raw);
                if parsed.is_empty() {
                    defaults.allowed_origins
                } else {
                    parsed
                }
            }
            Err(_) => defaults.allowed_origins,
        };

        Self {
            backend_host,
            backend_port,
            allowed_origins,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.backend_host, self.backend_port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
