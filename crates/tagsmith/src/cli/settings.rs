//! Single-key edits of the config file that keep its comments and layout.

use std::path::Path;

use tagsmith_core::Config;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Set `section.field` to `raw` in the config file at `path`.
///
/// The key must exist in the configuration schema, and the edited file must
/// still validate; otherwise nothing is written.
pub fn set_value(path: &Path, key: &str, raw: &str) -> anyhow::Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let updated = apply(&content, key, raw)?;
    Config::parse(&updated)
        .map_err(|e| anyhow::anyhow!("Refusing to set {key} = {raw}: {e}"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, updated)?;
    tracing::debug!("Set {} = {} in {}", key, raw, path.display());
    Ok(())
}

/// Apply one `section.field = value` edit to TOML text.
pub fn apply(content: &str, key: &str, raw: &str) -> anyhow::Result<String> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| anyhow::anyhow!("Key must look like section.field, got {key:?}"))?;
    if !is_known_key(section, field)? {
        anyhow::bail!("Unknown config key: {key}");
    }

    let mut doc: DocumentMut = content
        .parse()
        .map_err(|e| anyhow::anyhow!("Config file is not valid TOML: {e}"))?;

    if !doc.contains_key(section) {
        doc[section] = Item::Table(Table::new());
    }
    doc[section][field] = Item::Value(parse_value(raw));
    Ok(doc.to_string())
}

/// TOML literals (`true`, `0.4`, `["jpg"]`, `"x"`) keep their type; anything
/// else is stored as a string.
fn parse_value(raw: &str) -> Value {
    let mut value = raw.parse::<Value>().unwrap_or_else(|_| Value::from(raw));
    value.decor_mut().clear();
    value
}

fn is_known_key(section: &str, field: &str) -> anyhow::Result<bool> {
    let defaults: DocumentMut = Config::default().to_toml()?.parse()?;
    Ok(defaults
        .get(section)
        .and_then(Item::as_table)
        .is_some_and(|t| t.contains_key(field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_preserves_comments() {
        let content = "# my settings\n[output]\n# write sidecars\npersist_tags = false\n";
        let updated = apply(content, "output.persist_tags", "true").unwrap();
        assert!(updated.contains("# my settings"));
        assert!(updated.contains("# write sidecars"));
        assert!(updated.contains("persist_tags = true"));
    }

    #[test]
    fn test_apply_creates_missing_section() {
        let updated = apply("", "general.agreed_terms", "true").unwrap();
        let config = Config::parse(&updated).unwrap();
        assert!(config.general.agreed_terms);
    }

    #[test]
    fn test_apply_bare_words_become_strings() {
        let updated = apply("", "logging.level", "debug").unwrap();
        assert_eq!(Config::parse(&updated).unwrap().logging.level, "debug");

        let updated = apply("", "general.model_dir", "~/models").unwrap();
        assert!(updated.contains("model_dir = \"~/models\""));
    }

    #[test]
    fn test_apply_array_value() {
        let updated = apply("", "discovery.extensions", "[\"png\", \"webp\"]").unwrap();
        let config = Config::parse(&updated).unwrap();
        assert_eq!(config.discovery.extensions, vec!["png", "webp"]);
    }

    #[test]
    fn test_apply_rejects_unknown_key() {
        assert!(apply("", "output.persist", "true").is_err());
        assert!(apply("", "persist_tags", "true").is_err());
    }

    #[test]
    fn test_set_value_rejects_invalid_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tagging]\ngeneral_threshold = 0.5\n").unwrap();

        assert!(set_value(&path, "tagging.general_threshold", "3").is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[tagging]\ngeneral_threshold = 0.5\n"
        );
    }

    #[test]
    fn test_set_value_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        set_value(&path, "output.persist_tags", "true").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert!(config.output.persist_tags);
    }
}
