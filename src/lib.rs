pub mod types;
pub mod config;
pub mod store;
pub mod roster;
pub mod tournament;
pub mod standings;
pub mod knockout;
pub mod tournament_commands;

use types::*;
use config::*;
use store::KvStore;
use tournament_commands::build_snapshot;

use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use axum::{
    extract::State as AxumState,
    response::IntoResponse,
    routing::{get, get_service},
    Router,
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tauri::{path::BaseDirectory, Manager, State};
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

// ── Config commands ────────────────────────────────────────────────────

#[tauri::command]
fn load_config() -> Result<AppConfig, String> {
    load_config_inner()
}

#[tauri::command]
fn save_config(config: AppConfig, store: State<'_, SharedStore>) -> Result<AppConfig, String> {
    let saved = save_config_inner(config)?;
    // Re-point the store in case the data directory moved.
    if let Ok(mut guard) = store.lock() {
        *guard = KvStore::new(data_dir(&saved));
    }
    Ok(saved)
}

// ── State server ───────────────────────────────────────────────────────

fn resolve_ui_dir(app: &tauri::App) -> PathBuf {
    if let Some(raw) = env_default("UI_DIR") {
        resolve_repo_path(&raw)
    } else {
        app
            .path()
            .resolve("ui", BaseDirectory::Resource)
            .ok()
            .filter(|path| path.is_dir())
            .unwrap_or_else(|| repo_root().join("ui"))
    }
}

fn state_router(state: StateServerState, static_dir: PathBuf) -> Router {
    let static_files = get_service(ServeDir::new(static_dir));

    Router::new()
        .route("/state.json", get(get_state_json))
        .nest_service("/", static_files)
        .with_state(state)
}

async fn start_state_server(state: StateServerState, static_dir: PathBuf, addr: &str) {
    let app = state_router(state, static_dir);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("state server failed to bind {addr}: {e}");
            return;
        }
    };
    info!("state server listening at http://{addr}/");
    if let Err(e) = axum::serve(listener, app).await {
        error!("state server error: {e}");
    }
}

async fn get_state_json(AxumState(state): AxumState<StateServerState>) -> impl IntoResponse {
    let snapshot = {
        let guard = state.store.lock().unwrap_or_else(|e| e.into_inner());
        build_snapshot(&guard)
    };
    let body = serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string());
    (
        [
            ("Content-Type", "application/json"),
            ("Cache-Control", "no-store"),
            ("Pragma", "no-cache"),
            ("Expires", "0"),
        ],
        body,
    )
}

// ── Entry point ────────────────────────────────────────────────────────

pub fn run() {
    load_env_file();

    // Initialize tracing with file output
    let logs_dir = repo_root().join("logs");
    fs::create_dir_all(&logs_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    info!("Cup Tracker starting");

    let app_config = load_config_inner().unwrap_or_else(|_| AppConfig::default());
    let store: SharedStore = Arc::new(Mutex::new(KvStore::new(data_dir(&app_config))));

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .manage(store.clone())
        .setup(move |app| {
            let ui_dir = resolve_ui_dir(app);
            fs::create_dir_all(&ui_dir).ok();

            let server_state = StateServerState {
                store: store.clone(),
            };
            tauri::async_runtime::spawn(start_state_server(
                server_state,
                ui_dir,
                STATE_SERVER_ADDR,
            ));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            tournament_commands::draw_groups,
            tournament_commands::generate_round,
            tournament_commands::submit_score,
            tournament_commands::standings,
            tournament_commands::draw_knockout,
            tournament_commands::tournament_state,
            tournament_commands::get_roster,
            tournament_commands::reset_tournament,
            load_config,
            save_config
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri app");
}
