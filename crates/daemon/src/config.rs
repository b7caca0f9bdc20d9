use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use trafficlight_core::{mode, ConfigError, Mode};

use crate::db::Credentials;

/// Store URL selecting the in-process map instead of SurrealDB.
pub const MEMORY_STORE: &str = "memory";

#[derive(Parser, Clone)]
#[command(name = "trafficlight-daemon", version, about = "Status light indicator service")]
pub struct Args {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Store endpoint: surrealkv://<dir>, mem://, ws://host:port, or `memory`.
    #[arg(long, env = "STORE_URL", default_value = "surrealkv://.trafficlight/db")]
    pub store_url: String,

    /// Root user for a remote store. Requires --store-pass.
    #[arg(long, env = "STORE_USER", requires = "store_pass")]
    pub store_user: Option<String>,

    /// Root password for a remote store. Requires --store-user.
    #[arg(long, env = "STORE_PASS", requires = "store_user", hide_env_values = true)]
    pub store_pass: Option<String>,

    /// Shared secret expected in webhook paths.
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Light mode: `public` or `ci`.
    #[arg(long, env = "LIGHT_MODE")]
    pub mode: Option<String>,

    /// Log filter (env-filter syntax).
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}

/// Validated daemon configuration.
#[derive(Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub store_url: String,
    pub credentials: Option<Credentials>,
    pub secret: Option<String>,
    pub mode: Mode,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("store_url", &self.store_url)
            .field("store_user", &self.credentials.as_ref().map(|c| &c.username))
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("mode", &self.mode)
            .finish()
    }
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let mode = mode::resolve(args.mode.as_deref())?;
        let credentials = match (args.store_user, args.store_pass) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Ok(Self {
            listen: SocketAddr::new(args.host, args.port),
            store_url: args.store_url,
            credentials,
            secret: args.secret,
            mode,
        })
    }
}
