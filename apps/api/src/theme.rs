//! Theme preference — the one durable piece of client state.
//!
//! A single `"light"`/`"dark"` string in a JSON file under the data
//! directory, read once at startup. GET falls back to the client-reported
//! OS color scheme when nothing is stored, then to light.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const THEME_LIGHT: &str = "light";
pub const THEME_DARK: &str = "dark";

fn is_valid(theme: &str) -> bool {
    theme == THEME_LIGHT || theme == THEME_DARK
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemePreference {
    theme: String,
}

#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<Mutex<ThemeInner>>,
}

struct ThemeInner {
    path: PathBuf,
    theme: Option<String>,
}

impl ThemeStore {
    /// Reads the stored preference, if any. An unreadable or out-of-domain
    /// file counts as absent.
    pub fn open(path: PathBuf) -> Self {
        let theme = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<ThemePreference>(&raw) {
                Ok(pref) if is_valid(&pref.theme) => Some(pref.theme),
                Ok(pref) => {
                    warn!("Ignoring stored theme {:?}", pref.theme);
                    None
                }
                Err(e) => {
                    warn!("Ignoring unreadable theme file: {e}");
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            inner: Arc::new(Mutex::new(ThemeInner { path, theme })),
        }
    }

    /// Stored preference, else a valid caller-supplied OS scheme, else light.
    pub fn resolve(&self, prefers: Option<&str>) -> String {
        let inner = self.lock();
        if let Some(theme) = &inner.theme {
            return theme.clone();
        }
        match prefers {
            Some(p) if is_valid(p) => p.to_string(),
            _ => THEME_LIGHT.to_string(),
        }
    }

    /// Persists atomically: write a temp file, then rename over the target.
    pub fn set(&self, theme: &str) -> Result<()> {
        let mut inner = self.lock();
        let payload = serde_json::to_vec_pretty(&ThemePreference {
            theme: theme.to_string(),
        })?;
        let tmp = inner.path.with_extension("tmp");
        std::fs::write(&tmp, payload)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &inner.path)
            .with_context(|| format!("Failed to replace {}", inner.path.display()))?;
        inner.theme = Some(theme.to_string());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ThemeInner> {
        self.inner.lock().expect("theme store lock poisoned")
    }
}

#[derive(Debug, Deserialize)]
pub struct ThemeQuery {
    /// The client's OS-preferred color scheme, used only when nothing is stored.
    pub prefers: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: String,
}

/// GET /api/v1/preferences/theme
pub async fn handle_get_theme(
    State(state): State<AppState>,
    Query(query): Query<ThemeQuery>,
) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme.resolve(query.prefers.as_deref()),
    })
}

/// PUT /api/v1/preferences/theme
pub async fn handle_put_theme(
    State(state): State<AppState>,
    Json(body): Json<ThemeBody>,
) -> Result<StatusCode, AppError> {
    if !is_valid(&body.theme) {
        return Err(AppError::Validation(format!(
            "Theme must be \"light\" or \"dark\", got {:?}",
            body.theme
        )));
    }
    state.theme.set(&body.theme).map_err(AppError::Internal)?;
    Ok(StatusCode::NO_CONTENT)
}
