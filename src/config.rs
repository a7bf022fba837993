//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `USERSVC_ADDR` | `0.0.0.0:3000` | socket address to bind |
//! | `USERSVC_API_TOKEN` | `secret-token` | shared secret; clients send `Authorization: Bearer <token>` |

use std::net::SocketAddr;

use tracing::warn;

use crate::error::Error;

pub const ADDR_VAR: &str = "USERSVC_ADDR";
pub const TOKEN_VAR: &str = "USERSVC_API_TOKEN";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TOKEN: &str = "secret-token";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub api_token: String,
}

impl Config {
    pub fn new(addr: SocketAddr, api_token: impl Into<String>) -> Self {
        Self {
            addr,
            api_token: api_token.into(),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let raw_addr = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let addr = raw_addr
            .parse()
            .map_err(|e| Error::Config(format!("{ADDR_VAR}={raw_addr:?}: {e}")))?;

        let api_token = lookup(TOKEN_VAR).unwrap_or_else(|| {
            warn!("{TOKEN_VAR} not set; using insecure dev default");
            DEFAULT_TOKEN.to_owned()
        });
        if api_token.trim().is_empty() {
            return Err(Error::Config(format!("{TOKEN_VAR} must not be empty")));
        }

        Ok(Self { addr, api_token })
    }
}
