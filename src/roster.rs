use crate::config::{load_config_inner, roster_path};
use crate::types::AppConfig;
use serde_json::Value;
use std::{collections::HashSet, fs, path::Path};

/// Built-in 24-team field used when no roster file is present.
pub fn default_roster() -> Vec<String> {
    [
        "Albania", "Austria", "Belgium", "Croatia", "Czech Republic", "England",
        "France", "Germany", "Hungary", "Iceland", "Italy", "Northern Ireland",
        "Poland", "Portugal", "Republic of Ireland", "Romania", "Russia",
        "Slovakia", "Spain", "Sweden", "Switzerland", "Turkey", "Ukraine",
        "Wales",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

/// Load the roster for the configured app. Missing file falls back to the
/// built-in default; an unreadable or malformed file is a user-facing error
/// (the roster is reference data, not engine state).
pub fn load_roster() -> Result<Vec<String>, String> {
    let config = load_config_inner().unwrap_or_else(|_| AppConfig::default());
    load_roster_from(&roster_path(&config))
}

pub fn load_roster_from(path: &Path) -> Result<Vec<String>, String> {
    let names: Vec<String> = if path.is_file() {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("read roster {}: {e}", path.display()))?;
        let value: Value = serde_json::from_str(&data)
            .map_err(|e| format!("parse roster {}: {e}", path.display()))?;
        if let Some(arr) = value.as_array() {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        } else if let Some(arr) = value.get("teams").and_then(|v| v.as_array()) {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        } else {
            return Err(format!(
                "Roster {} must be an array of team names or an object with a \"teams\" array.",
                path.display()
            ));
        }
    } else {
        default_roster()
    };

    normalize_roster(names)
}

/// Trim entries, drop empties, reject duplicates.
pub fn normalize_roster(names: Vec<String>) -> Result<Vec<String>, String> {
    let mut out = Vec::with_capacity(names.len());
    let mut seen = HashSet::new();
    for raw in names {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(format!("Duplicate team name in roster: {trimmed}."));
        }
        out.push(trimmed.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FIELD_SIZE;
    use std::env;

    fn write_temp_roster(tag: &str, contents: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!(
            "cup-tracker-roster-{tag}-{}.json",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_roster_is_a_full_field() {
        let roster = default_roster();
        assert_eq!(roster.len(), FIELD_SIZE);
        let unique: HashSet<&String> = roster.iter().collect();
        assert_eq!(unique.len(), FIELD_SIZE);
    }

    #[test]
    fn test_load_roster_array_shape() {
        let path = write_temp_roster("array", r#"["Spain", " Italy ", ""]"#);
        let roster = load_roster_from(&path).unwrap();
        assert_eq!(roster, vec!["Spain".to_string(), "Italy".to_string()]);
    }

    #[test]
    fn test_load_roster_object_shape() {
        let path = write_temp_roster("object", r#"{"teams": ["Spain", "Italy"]}"#);
        let roster = load_roster_from(&path).unwrap();
        assert_eq!(roster, vec!["Spain".to_string(), "Italy".to_string()]);
    }

    #[test]
    fn test_load_roster_rejects_other_shapes() {
        let path = write_temp_roster("bad-shape", r#"{"names": []}"#);
        assert!(load_roster_from(&path).is_err());
    }

    #[test]
    fn test_duplicate_names_are_an_error() {
        let err = normalize_roster(vec![
            "Spain".to_string(),
            "Italy".to_string(),
            "Spain ".to_string(),
        ])
        .unwrap_err();
        assert!(err.contains("Duplicate"));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = env::temp_dir().join("cup-tracker-roster-definitely-missing.json");
        let _ = fs::remove_file(&path);
        let roster = load_roster_from(&path).unwrap();
        assert_eq!(roster, default_roster());
    }
}
