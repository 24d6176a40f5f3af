use std::time::Duration;

use dapparchive_db::RetryPolicy;

/// Clerk identity provider configuration. Both values must be present for
/// session tokens to be verified; otherwise all requests are anonymous.
#[derive(Debug, Clone, Default)]
pub struct ClerkConfig {
    /// Backend API key (`CLERK_SECRET_KEY`).
    pub secret_key: Option<String>,
    /// PEM-encoded RSA public key for session JWTs (`CLERK_JWT_PUBLIC_KEY`).
    pub jwt_public_key: Option<String>,
}

/// Stripe billing configuration.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (`STRIPE_SECRET_KEY`). Absent disables checkout.
    pub secret_key: Option<String>,
    /// Webhook signing secret (`STRIPE_WEBHOOK_SECRET`). Absent disables
    /// the webhook endpoint entirely; unsigned events are never accepted.
    pub webhook_secret: Option<String>,
    /// One-time premium price in cents (`STRIPE_PRICE_CENTS`, default 500).
    pub price_cents: u32,
    /// Product name shown on the checkout page.
    pub product_name: String,
}

/// Supabase object storage configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL (`SUPABASE_URL`).
    pub url: Option<String>,
    /// Service-role key (`SUPABASE_SERVICE_KEY`).
    pub service_key: Option<String>,
    /// Bucket holding screenshot objects (`SUPABASE_STORAGE_BUCKET`).
    pub bucket: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. External
/// integrations (database, identity, billing, storage) are optional: a
/// missing variable disables that integration and the server starts in a
/// degraded mode rather than refusing to boot.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres connection URL. Absent starts the server disconnected.
    pub database_url: Option<String>,
    /// Public base URL of the site, used for checkout redirect URLs.
    pub public_base_url: String,
    /// The one email address granted admin access (`ADMIN_EMAIL`).
    pub admin_email: Option<String>,
    /// Insert demo catalog data on startup (`SEED_ON_START`, default false).
    pub seed_on_start: bool,
    /// Retry/backoff tuning for the data layer.
    pub retry: RetryPolicy,
    pub clerk: ClerkConfig,
    pub stripe: StripeConfig,
    pub supabase: SupabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `DATABASE_URL`              | (unset: degraded mode)  |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:3000` |
    /// | `ADMIN_EMAIL`               | (unset: no admin)       |
    /// | `SEED_ON_START`             | `false`                 |
    /// | `DB_RETRY_MAX_ATTEMPTS`     | `4`                     |
    /// | `DB_RETRY_INITIAL_DELAY_MS` | `200`                   |
    /// | `DB_RETRY_MAX_DELAY_MS`     | `5000`                  |
    /// | `DB_OP_TIMEOUT_SECS`        | `5`                     |
    /// | `STRIPE_PRICE_CENTS`        | `500`                   |
    /// | `SUPABASE_STORAGE_BUCKET`   | `images`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: env_parse("DB_RETRY_MAX_ATTEMPTS", defaults.max_attempts),
            initial_delay: Duration::from_millis(env_parse(
                "DB_RETRY_INITIAL_DELAY_MS",
                defaults.initial_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(env_parse(
                "DB_RETRY_MAX_DELAY_MS",
                defaults.max_delay.as_millis() as u64,
            )),
            multiplier: defaults.multiplier,
            op_timeout: Duration::from_secs(env_parse(
                "DB_OP_TIMEOUT_SECS",
                defaults.op_timeout.as_secs(),
            )),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url: env_opt("DATABASE_URL"),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            admin_email: env_opt("ADMIN_EMAIL"),
            seed_on_start: matches!(
                std::env::var("SEED_ON_START").as_deref(),
                Ok("true") | Ok("1")
            ),
            retry,
            clerk: ClerkConfig {
                secret_key: env_opt("CLERK_SECRET_KEY"),
                jwt_public_key: env_opt("CLERK_JWT_PUBLIC_KEY"),
            },
            stripe: StripeConfig {
                secret_key: env_opt("STRIPE_SECRET_KEY"),
                webhook_secret: env_opt("STRIPE_WEBHOOK_SECRET"),
                price_cents: env_parse("STRIPE_PRICE_CENTS", 500),
                product_name: std::env::var("STRIPE_PRODUCT_NAME")
                    .unwrap_or_else(|_| "Dapp Design Archive - Lifetime Access".into()),
            },
            supabase: SupabaseConfig {
                url: env_opt("SUPABASE_URL"),
                service_key: env_opt("SUPABASE_SERVICE_KEY"),
                bucket: std::env::var("SUPABASE_STORAGE_BUCKET")
                    .unwrap_or_else(|_| "images".into()),
            },
        }
    }
}

/// Read an optional env var, treating empty values as unset.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an env var, falling back to `default` when unset.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid number")),
        Err(_) => default,
    }
}
