use serde_json::Value;
use std::{fs, path::PathBuf};
use tracing::warn;

/// File-per-key JSON store. Each logical key lives at `<root>/<key>.json`.
/// Reads never fail across this boundary: a missing, unreadable, or
/// unparseable file loads as absent.
pub struct KvStore {
    root: PathBuf,
}

impl KvStore {
    pub fn new(root: PathBuf) -> Self {
        KvStore { root }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn load(&self, key: &str) -> Option<Value> {
        let path = self.key_path(key);
        if !path.is_file() {
            return None;
        }
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                warn!("read {}: {e}; treating as absent", path.display());
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("parse {}: {e}; treating as absent", path.display());
                None
            }
        }
    }

    pub fn save(&self, key: &str, value: &Value) -> Result<(), String> {
        fs::create_dir_all(&self.root)
            .map_err(|e| format!("create data dir {}: {e}", self.root.display()))?;
        let path = self.key_path(key);
        let payload = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
        fs::write(&path, payload).map_err(|e| format!("write {}: {e}", path.display()))
    }

    pub fn remove(&self, key: &str) -> Result<(), String> {
        let path = self.key_path(key);
        if !path.is_file() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| format!("remove {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::env;

    fn temp_store(tag: &str) -> KvStore {
        let root = env::temp_dir().join(format!(
            "cup-tracker-store-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        KvStore::new(root)
    }

    #[test]
    fn test_save_load_remove_round_trip() {
        let store = temp_store("roundtrip");
        assert!(store.load("groups").is_none());

        let value = json!({ "teams": ["Spain", "Italy"] });
        store.save("groups", &value).unwrap();
        assert_eq!(store.load("groups"), Some(value));

        store.remove("groups").unwrap();
        assert!(store.load("groups").is_none());

        // Removing an absent key is not an error.
        store.remove("groups").unwrap();
    }

    #[test]
    fn test_malformed_value_loads_as_absent() {
        let store = temp_store("malformed");
        store.save("matches", &json!([])).unwrap();
        fs::write(store.root().join("matches.json"), "{not json").unwrap();
        assert!(store.load("matches").is_none());
    }
}
