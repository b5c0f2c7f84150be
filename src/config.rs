use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services
/// (Repository, Storage, the session gate). It is pulled into the application state
/// via FromRef, embodying the "immutable AppConfig" part of the Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // MongoDB connection string.
    pub mongodb_uri: String,
    // Database holding the `projects` collection.
    pub db_name: String,
    // Admin credentials checked by the session gate's login step.
    pub admin_username: String,
    pub admin_password: String,
    // Directory where uploaded project images are written.
    pub upload_dir: String,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls the Secure cookie flag and log format.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, auto-created upload dir, default credentials) and production-grade
/// behavior (JSON logs, Secure cookies, mandatory secrets).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: "portfolio_test".to_string(),
            // Development fallback credentials.
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            upload_dir: "public/uploads".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the **fail-fast**
    /// principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime
    /// environment (especially Production) is not found. This prevents the application
    /// from starting with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // Credential Resolution
        // Production refuses to start on the well-known development defaults.
        let (admin_username, admin_password) = match env {
            Env::Production => (
                env::var("ADMIN_USERNAME")
                    .expect("FATAL: ADMIN_USERNAME must be set in production."),
                env::var("ADMIN_PASSWORD")
                    .expect("FATAL: ADMIN_PASSWORD must be set in production."),
            ),
            _ => (
                env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            ),
        };

        let mongodb_uri = match env {
            Env::Production => env::var("MONGODB_URI").expect("FATAL: MONGODB_URI required in prod"),
            _ => env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        };

        Self {
            env,
            mongodb_uri,
            db_name: env::var("MONGODB_DB").unwrap_or_else(|_| "portfolio_db".to_string()),
            admin_username,
            admin_password,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/uploads".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        }
    }
}
