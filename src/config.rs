use crate::types::*;
use chrono::Local;
use std::{
    env,
    fs,
    io::Write,
    path::PathBuf,
};

pub fn repo_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn resolve_repo_path(raw: &str) -> PathBuf {
  let path = PathBuf::from(raw);
  if path.is_absolute() {
    path
  } else {
    repo_root().join(path)
  }
}

pub fn config_path() -> PathBuf {
  repo_root().join("config.json")
}

pub fn env_default(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

pub fn apply_env_defaults(mut config: AppConfig) -> AppConfig {
  if config.data_dir.trim().is_empty() {
    if let Some(value) = env_default("CUP_DATA_DIR") {
      config.data_dir = value;
    }
  }
  if config.roster_path.trim().is_empty() {
    if let Some(value) = env_default("CUP_ROSTER_PATH") {
      config.roster_path = value;
    }
  }
  config
}

pub fn load_config_inner() -> Result<AppConfig, String> {
  let path = config_path();
  if !path.is_file() {
    return Ok(apply_env_defaults(AppConfig::default()));
  }
  let data = fs::read_to_string(&path).map_err(|e| format!("read config {}: {e}", path.display()))?;
  let config =
    serde_json::from_str::<AppConfig>(&data).map_err(|e| format!("parse config {}: {e}", path.display()))?;
  Ok(apply_env_defaults(config))
}

pub fn save_config_inner(config: AppConfig) -> Result<AppConfig, String> {
  let path = config_path();
  let payload = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
  fs::write(&path, payload).map_err(|e| format!("write config {}: {e}", path.display()))?;
  Ok(config)
}

pub fn load_env_file() {
  let env_path = repo_root().join(".env");
  if !env_path.is_file() {
    return;
  }
  let contents = match fs::read_to_string(&env_path) {
    Ok(data) => data,
    Err(_) => return,
  };
  for line in contents.lines() {
    if let Some((key, value)) = parse_env_line(line) {
      if env::var_os(&key).is_none() {
        env::set_var(key, value);
      }
    }
  }
}

pub fn parse_env_line(line: &str) -> Option<(String, String)> {
  let trimmed = line.trim();
  if trimmed.is_empty() || trimmed.starts_with('#') {
    return None;
  }
  let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
  let (key, raw_value) = trimmed.split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }
  let mut value = raw_value.trim();
  if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if let Some(idx) = value.find('#') {
    value = value[..idx].trim_end();
  }
  Some((key.to_string(), value.to_string()))
}

// ── Resolved app paths ─────────────────────────────────────────────────

pub fn data_dir(config: &AppConfig) -> PathBuf {
  let raw = config.data_dir.trim();
  if raw.is_empty() {
    repo_root().join("data")
  } else {
    resolve_repo_path(raw)
  }
}

pub fn roster_path(config: &AppConfig) -> PathBuf {
  let raw = config.roster_path.trim();
  if raw.is_empty() {
    repo_root().join("roster.json")
  } else {
    resolve_repo_path(raw)
  }
}

// ── Results audit log ──────────────────────────────────────────────────

pub fn results_log_path() -> PathBuf {
  repo_root().join("logs").join("results.log")
}

pub fn append_result_log(entry: &str) {
  let dir = repo_root().join("logs");
  if fs::create_dir_all(&dir).is_err() {
    return;
  }
  let path = results_log_path();
  let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
  let line = format!("[{timestamp}] {entry}\n");
  if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
    let _ = file.write_all(line.as_bytes());
  }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_line_shapes() {
        assert_eq!(
            parse_env_line("CUP_DATA_DIR=/tmp/data"),
            Some(("CUP_DATA_DIR".to_string(), "/tmp/data".to_string()))
        );
        assert_eq!(
            parse_env_line("export CUP_ROSTER_PATH=\"rosters/euro.json\""),
            Some(("CUP_ROSTER_PATH".to_string(), "rosters/euro.json".to_string()))
        );
        assert_eq!(
            parse_env_line("KEY=value # trailing comment"),
            Some(("KEY".to_string(), "value".to_string()))
        );
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line("   "), None);
    }

    #[test]
    fn test_data_dir_defaults_and_resolution() {
        let config = AppConfig::default();
        assert_eq!(data_dir(&config), repo_root().join("data"));

        let config = AppConfig {
            data_dir: "state".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(data_dir(&config), repo_root().join("state"));

        let config = AppConfig {
            data_dir: "/abs/state".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(data_dir(&config), PathBuf::from("/abs/state"));
    }
}
