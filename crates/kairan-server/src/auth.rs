//! Login endpoints and the resident access-code registry.
//!
//! Two parties authenticate: the administration with a configured
//! argon2-hashed password, and residents with a short numeric code they
//! pick on first login. Codes are hashed like any other credential, but
//! they are convenience codes — this is estate signage, not a vault.

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::post,
};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use kairan_core::{pin::validate_pin, roster::Roster};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  Unauthorized,

  /// First-login code rejected by the weak-code rules.
  #[error(transparent)]
  InvalidPin(kairan_core::Error),

  #[error("internal error: {0}")]
  Internal(String),
}

impl IntoResponse for AuthError {
  fn into_response(self) -> Response {
    let status = match &self {
      AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
      AuthError::InvalidPin(_) => StatusCode::BAD_REQUEST,
      AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

// ─── PIN registry ────────────────────────────────────────────────────────────

struct RegistryInner {
  pins:     BTreeMap<String, String>,
  path:     Option<PathBuf>,
  degraded: bool,
}

/// Resident-id → argon2 PHC string, persisted as one JSON object. Load
/// and save degrade the same way the bulletin store does: a broken file
/// starts empty, a failed save is reported once and the registry runs
/// memory-only afterwards.
pub struct PinRegistry {
  inner: Mutex<RegistryInner>,
}

impl PinRegistry {
  pub fn open(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref().to_path_buf();
    let pins = match fs::read_to_string(&path) {
      Ok(raw) => match serde_json::from_str(&raw) {
        Ok(pins) => pins,
        Err(e) => {
          tracing::warn!("malformed pin registry {path:?}: {e}; starting empty");
          BTreeMap::new()
        }
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
      Err(e) => {
        tracing::warn!("cannot read pin registry {path:?}: {e}; starting empty");
        BTreeMap::new()
      }
    };
    Self {
      inner: Mutex::new(RegistryInner { pins, path: Some(path), degraded: false }),
    }
  }

  /// A memory-only registry — useful for testing.
  pub fn in_memory() -> Self {
    Self {
      inner: Mutex::new(RegistryInner {
        pins:     BTreeMap::new(),
        path:     None,
        degraded: false,
      }),
    }
  }

  /// Verify a resident's code, or — on their very first login — validate
  /// and register it. Registration is all-or-nothing: a rejected code
  /// leaves no trace.
  pub fn verify_or_register(
    &self,
    resident_id: &str,
    pin: &str,
  ) -> Result<(), AuthError> {
    let mut inner = self.inner.lock().expect("registry mutex poisoned");

    match inner.pins.get(resident_id) {
      Some(hash) => {
        let parsed =
          PasswordHash::new(hash).map_err(|_| AuthError::Unauthorized)?;
        Argon2::default()
          .verify_password(pin.as_bytes(), &parsed)
          .map_err(|_| AuthError::Unauthorized)
      }
      None => {
        validate_pin(pin).map_err(AuthError::InvalidPin)?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
          .hash_password(pin.as_bytes(), &salt)
          .map_err(|e| AuthError::Internal(format!("argon2 error: {e}")))?
          .to_string();
        inner.pins.insert(resident_id.to_owned(), hash);
        inner.persist();
        Ok(())
      }
    }
  }
}

impl RegistryInner {
  fn persist(&mut self) {
    let Some(path) = self.path.clone() else { return };
    if self.degraded {
      return;
    }
    let write = serde_json::to_string_pretty(&self.pins)
      .map_err(std::io::Error::from)
      .and_then(|raw| fs::write(&path, raw));
    if let Err(e) = write {
      tracing::error!(
        "cannot persist pin registry to {path:?}: {e}; continuing in memory only"
      );
      self.degraded = true;
    }
  }
}

// ─── State & handlers ────────────────────────────────────────────────────────

/// Shared state for the login endpoints.
#[derive(Clone)]
pub struct AuthState {
  pub roster:     Arc<Roster>,
  /// PHC string for the administration password.
  pub admin_hash: String,
  pub pins:       Arc<PinRegistry>,
}

#[derive(Debug, Deserialize)]
pub struct AdminLogin {
  pub password: String,
}

/// `POST /auth/admin` — body: `{"password":"…"}`
pub async fn admin_login(
  State(auth): State<AuthState>,
  Json(body): Json<AdminLogin>,
) -> Result<Json<serde_json::Value>, AuthError> {
  let parsed =
    PasswordHash::new(&auth.admin_hash).map_err(|_| AuthError::Unauthorized)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed)
    .map_err(|_| AuthError::Unauthorized)?;
  Ok(Json(json!({ "id": "admin", "name": "管理者", "role": "admin" })))
}

#[derive(Debug, Deserialize)]
pub struct ResidentLogin {
  pub id:  String,
  pub pin: String,
}

/// `POST /auth/resident` — body: `{"id":"A001","pin":"2048"}`
pub async fn resident_login(
  State(auth): State<AuthState>,
  Json(body): Json<ResidentLogin>,
) -> Result<Json<serde_json::Value>, AuthError> {
  let resident =
    auth.roster.by_id(&body.id).ok_or(AuthError::Unauthorized)?;
  auth.pins.verify_or_register(&body.id, &body.pin)?;
  Ok(Json(json!({
    "id": resident.id,
    "name": resident.name,
    "block": resident.block,
    "role": "resident",
  })))
}

/// Login routes, mounted at the application root.
pub fn router(state: AuthState) -> Router<()> {
  Router::new()
    .route("/auth/admin", post(admin_login))
    .route("/auth/resident", post(resident_login))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt as _;

  fn phc(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn make_state(admin_password: &str) -> AuthState {
    AuthState {
      roster:     Arc::new(Roster::standard()),
      admin_hash: phc(admin_password),
      pins:       Arc::new(PinRegistry::in_memory()),
    }
  }

  async fn login(
    state: AuthState,
    uri: &str,
    body: serde_json::Value,
  ) -> StatusCode {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    router(state).oneshot(req).await.unwrap().status()
  }

  #[tokio::test]
  async fn admin_password_is_verified_against_the_hash() {
    let state = make_state("sekigaharA9");
    let ok = login(
      state.clone(),
      "/auth/admin",
      json!({ "password": "sekigaharA9" }),
    )
    .await;
    assert_eq!(ok, StatusCode::OK);

    let bad =
      login(state, "/auth/admin", json!({ "password": "wrong" })).await;
    assert_eq!(bad, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn first_resident_login_registers_then_verifies() {
    let state = make_state("x");
    let body = json!({ "id": "A001", "pin": "2048" });

    let first = login(state.clone(), "/auth/resident", body.clone()).await;
    assert_eq!(first, StatusCode::OK);

    // Same code logs in again; a different one does not.
    let again = login(state.clone(), "/auth/resident", body).await;
    assert_eq!(again, StatusCode::OK);

    let wrong = login(
      state,
      "/auth/resident",
      json!({ "id": "A001", "pin": "2049" }),
    )
    .await;
    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn guessable_codes_are_rejected_at_registration() {
    let state = make_state("x");
    for pin in ["1111", "1234", "4321"] {
      let status = login(
        state.clone(),
        "/auth/resident",
        json!({ "id": "B001", "pin": pin }),
      )
      .await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "pin {pin}");
    }
    // A rejected registration left nothing behind: a sound code still
    // registers fresh.
    let ok = login(
      state,
      "/auth/resident",
      json!({ "id": "B001", "pin": "2048" }),
    )
    .await;
    assert_eq!(ok, StatusCode::OK);
  }

  #[tokio::test]
  async fn unknown_resident_is_rejected() {
    let state = make_state("x");
    let status = login(
      state,
      "/auth/resident",
      json!({ "id": "Z999", "pin": "2048" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn registry_round_trips_through_its_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pins.json");

    {
      let registry = PinRegistry::open(&path);
      registry.verify_or_register("A001", "2048").unwrap();
    }

    let reopened = PinRegistry::open(&path);
    assert!(reopened.verify_or_register("A001", "2048").is_ok());
    assert!(matches!(
      reopened.verify_or_register("A001", "9876"),
      Err(AuthError::Unauthorized)
    ));
  }
}
