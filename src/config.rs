use clap::Args;

/// Settings shared by every subcommand. Each flag falls back to an
/// environment variable, and `.env` is loaded before parsing.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:data/gamenight.db", global = true)]
    pub database_url: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080, global = true)]
    pub port: u16,

    /// Mark the session cookie `Secure` (serve behind TLS)
    #[arg(long, env = "SECURE_COOKIES", global = true)]
    pub secure_cookies: bool,

    /// bcrypt work factor for new password hashes
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST, global = true)]
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            secure_cookies: self.secure_cookies,
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

/// The part of the configuration request handlers need.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub secure_cookies: bool,
    pub bcrypt_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secure_cookies: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}
