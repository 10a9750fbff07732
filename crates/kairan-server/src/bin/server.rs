//! kairan server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! JSON bulletin store, and serves the REST API plus the login endpoints.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash` in
//! config.toml:
//!
//! ```
//! cargo run -p kairan-server --bin server -- --hash-password
//! ```

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use kairan_api::ApiState;
use kairan_core::roster::Roster;
use kairan_server::{ServerConfig, auth::{AuthState, PinRegistry}};
use kairan_store_json::JsonStore;

#[derive(Parser)]
#[command(author, version, about = "kairan bulletin server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("KAIRAN"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the bulletin store and the access-code registry.
  let store = JsonStore::open(&server_cfg.store_path);
  let pins = PinRegistry::open(&server_cfg.pin_path);

  // The roster is reference data: from a file when configured, otherwise
  // the built-in standard roster.
  let roster = match &server_cfg.roster_path {
    Some(path) => {
      let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster at {path:?}"))?;
      serde_json::from_str::<Roster>(&raw)
        .with_context(|| format!("failed to parse roster at {path:?}"))?
    }
    None => Roster::standard(),
  };
  tracing::info!("roster holds {} residents", roster.len());

  let roster = Arc::new(roster);
  let api = ApiState::new(Arc::new(store), roster.clone());
  let auth = AuthState {
    roster,
    admin_hash: server_cfg.admin_password_hash.clone(),
    pins: Arc::new(pins),
  };

  let app = kairan_server::router(api, auth);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
