//! Environment-driven runtime configuration.

/// Funds the default deployment resolves. Anything else is dropped by the
/// allow-list policy unless `NAV_ALLOW_ALL` is set.
pub const DEFAULT_ALLOW_LIST: [&str; 9] = [
    "TSLW", "HOOW", "PLTW", "MSTY", "NVDW", "NVDY", "YBTC", "CONY", "NVDL",
];

/// Which acquisition strategy a deployment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherKind {
    /// Single published CSV file.
    Csv,
    /// Per-fund page scraping.
    Pages,
}

impl FetcherKind {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pages" | "html" => Self::Pages,
            _ => Self::Csv,
        }
    }
}

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub fetcher: FetcherKind,
    pub csv_url: Option<String>,
    pub page_base: Option<String>,
    /// Disables the allow-list and resolves any requested ticker.
    pub allow_all: bool,
    /// Explicit opt-in to skip TLS certificate verification.
    pub insecure_tls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            fetcher: FetcherKind::Csv,
            csv_url: None,
            page_base: None,
            allow_all: false,
            insecure_tls: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            fetcher: std::env::var("NAV_FETCHER")
                .map(|v| FetcherKind::from_env_value(&v))
                .unwrap_or(defaults.fetcher),
            csv_url: std::env::var("NAV_CSV_URL").ok().filter(|v| !v.is_empty()),
            page_base: std::env::var("NAV_PAGE_BASE").ok().filter(|v| !v.is_empty()),
            allow_all: env_flag("NAV_ALLOW_ALL"),
            insecure_tls: env_flag("NAV_INSECURE_TLS"),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
