use anyhow::{Context, Result};
use clap::Parser;
use std::{env, path::PathBuf};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
///
/// With no `UPLOAD_SERVER_*` variables and no flags set, the server listens
/// on port 5000 and stores files in `uploads/` beside the executable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: PathBuf,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Single-file upload server")]
pub struct Args {
    /// Host to bind to (overrides UPLOAD_SERVER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides UPLOAD_SERVER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where uploads are stored (overrides UPLOAD_SERVER_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,
}

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STORAGE_DIR_NAME: &str = "uploads";

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    fn from_args(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("UPLOAD_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("UPLOAD_SERVER_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing UPLOAD_SERVER_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => DEFAULT_PORT,
            Err(err) => return Err(err).context("reading UPLOAD_SERVER_PORT"),
        };
        let env_storage = match env::var_os("UPLOAD_SERVER_STORAGE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_storage_dir()?,
        };

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `uploads/` beside the running executable.
fn default_storage_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("resolving current executable path")?;
    let base = exe
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join(DEFAULT_STORAGE_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_take_precedence() {
        let args = Args::parse_from([
            "upload-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--storage-dir",
            "/tmp/uploads",
        ]);
        let cfg = AppConfig::from_args(args).unwrap();

        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.storage_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(cfg.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn default_storage_dir_sits_next_to_executable() {
        let dir = default_storage_dir().unwrap();
        assert!(dir.ends_with(DEFAULT_STORAGE_DIR_NAME));
        assert_eq!(dir.parent(), env::current_exe().unwrap().parent());
    }
}
