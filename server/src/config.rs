use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use error_stack::{Report, ResultExt};
use kernel::KernelError;

/// Process settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    pub seed_sample_data: bool,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                return Err(Report::new(KernelError::Internal)
                    .attach_printable(format!("Failed to load .env: {error}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> error_stack::Result<Self, KernelError> {
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("PORT is not a port number: {port}"))?,
            None => 5000,
        };
        let address = match lookup("BIND_ADDR") {
            Some(address) => address
                .parse::<IpAddr>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("BIND_ADDR is not an IP address: {address}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(flag) => match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(Report::new(KernelError::Internal)
                        .attach_printable(format!("SEED_SAMPLE_DATA is not a boolean: {flag}")))
                }
            },
            None => true,
        };
        let log_dir = lookup("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./logs"));

        Ok(Self {
            bind: SocketAddr::new(address, port),
            seed_sample_data,
            log_dir,
        })
    }
}
