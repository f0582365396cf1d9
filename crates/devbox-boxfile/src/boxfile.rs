use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

use crate::error::BoxfileError;
use crate::node::Node;
use crate::ConfigSnapshot;

/// A boxfile parsed from YAML text.
#[derive(Debug, Clone, Default)]
pub struct Boxfile {
    root: Map<String, Value>,
    /// Top-level keys in document order.
    order: Vec<String>,
}

impl Boxfile {
    /// Parses boxfile text, rejecting malformed YAML and non-mapping roots.
    ///
    /// Empty text (or a document holding only `null`) yields an empty boxfile.
    pub fn parse(text: &str) -> Result<Self, BoxfileError> {
        let document: Yaml = serde_yaml::from_str(text)?;
        let mapping = match document {
            Yaml::Null => serde_yaml::Mapping::new(),
            Yaml::Mapping(mapping) => mapping,
            Yaml::Tagged(tagged) => match tagged.value {
                Yaml::Mapping(mapping) => mapping,
                other => return Err(BoxfileError::not_a_mapping(kind(&other))),
            },
            other => return Err(BoxfileError::not_a_mapping(kind(&other))),
        };

        let mut order = Vec::with_capacity(mapping.len());
        let root = to_object(mapping, |key| order.push(key.to_string()))?;
        Ok(Self { root, order })
    }

    /// Lenient constructor: text that fails to parse yields an empty boxfile
    /// whose nodes are all invalid.
    pub fn new(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Treating unparseable boxfile as empty");
            Self::default()
        })
    }

    /// All top-level node names in document order.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

impl ConfigSnapshot for Boxfile {
    fn node(&self, name: &str) -> Node {
        self.root
            .get(name)
            .cloned()
            .map(Node::new)
            .unwrap_or_else(Node::invalid)
    }

    fn nodes(&self, category: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| {
                name.split_once('.')
                    .is_some_and(|(cat, rest)| cat == category && !rest.is_empty())
            })
            .cloned()
            .collect()
    }
}

fn kind(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

fn key_string(key: &Yaml) -> String {
    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Converts a mapping, calling `on_key` for each key in document order.
///
/// Keys that stringify to the same text (`5432` and `"5432"`) are rejected.
fn to_object(
    mapping: serde_yaml::Mapping,
    mut on_key: impl FnMut(&str),
) -> Result<Map<String, Value>, BoxfileError> {
    let mut object = Map::new();
    for (key, value) in mapping {
        let key = key_string(&key);
        if object.contains_key(&key) {
            return Err(BoxfileError::duplicate_key(key));
        }
        on_key(&key);
        object.insert(key, to_json(value)?);
    }
    Ok(object)
}

fn to_json(value: Yaml) -> Result<Value, BoxfileError> {
    let value = match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => Value::Object(to_object(mapping, |_| {})?),
        Yaml::Tagged(tagged) => to_json(tagged.value)?,
    };
    Ok(value)
}

/// JSON has no NaN or infinity; those keep their YAML spelling as a string.
fn number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Number(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Value::Number(u.into());
    }
    match n.as_f64().and_then(Number::from_f64) {
        Some(finite) => Value::Number(finite),
        None => Value::String(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BOXFILE: &str = r#"
run.config:
  engine: ruby

web.site:
  start: bundle exec puma
  ports:
    - 8080

data.db:
  image: postgres:13
  config:
    version: 13
    extensions: [uuid-ossp]

data.cache:
  image: redis:6

worker.jobs:
  start: bundle exec sidekiq
"#;

    #[test]
    fn test_parse_and_lookup() {
        let boxfile = Boxfile::parse(BOXFILE).unwrap();
        let db = boxfile.node("data.db");
        assert!(db.is_valid());
        assert_eq!(db.string_value("image"), Some("postgres:13"));
        assert!(!boxfile.node("data.missing").is_valid());
    }

    #[test]
    fn test_nodes_by_category_in_document_order() {
        let boxfile = Boxfile::parse(BOXFILE).unwrap();
        assert_eq!(boxfile.nodes("data"), vec!["data.db", "data.cache"]);
        assert_eq!(boxfile.nodes("web"), vec!["web.site"]);
        assert_eq!(boxfile.nodes("run"), vec!["run.config"]);
        assert!(boxfile.nodes("dat").is_empty());
        assert!(boxfile.nodes("missing").is_empty());
    }

    #[test]
    fn test_bare_category_key_is_not_a_member() {
        let boxfile = Boxfile::parse("data.:\n  image: x\ndata:\n  image: y\n").unwrap();
        assert!(boxfile.nodes("data").is_empty());
    }

    #[test]
    fn test_reordering_and_whitespace_do_not_change_nodes() {
        let a = Boxfile::parse("data.db:\n  image: postgres:13\n  config:\n    a: 1\n    b: 2\n")
            .unwrap();
        let b = Boxfile::parse(
            "# comment\ndata.db:\n    config: {b: 2,   a: 1}\n    image: 'postgres:13'\n",
        )
        .unwrap();
        assert!(a.node("data.db").equal(&b.node("data.db")));
    }

    #[test]
    fn test_empty_text_is_empty_boxfile() {
        let boxfile = Boxfile::parse("").unwrap();
        assert!(boxfile.names().is_empty());
        assert!(boxfile.nodes("data").is_empty());
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let err = Boxfile::parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, BoxfileError::NotAMapping { found: "sequence" }));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            Boxfile::parse("data.db: [unclosed").unwrap_err(),
            BoxfileError::Yaml(_)
        ));
        let lenient = Boxfile::new("data.db: [unclosed");
        assert!(lenient.names().is_empty());
        assert!(!lenient.node("data.db").is_valid());
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let boxfile = Boxfile::parse("data.db:\n  ports:\n    5432: tcp\n").unwrap();
        let expected = Node::new(json!({"ports": {"5432": "tcp"}}));
        assert!(boxfile.node("data.db").equal(&expected));
    }

    #[test]
    fn test_keys_colliding_after_stringify_are_rejected() {
        let err = Boxfile::parse("data.db:\n  ports:\n    5432: tcp\n    \"5432\": udp\n")
            .unwrap_err();
        assert!(matches!(err, BoxfileError::DuplicateKey { ref key } if key == "5432"));

        let err = Boxfile::parse("~: a\n\"~\": b\n").unwrap_err();
        assert!(matches!(err, BoxfileError::DuplicateKey { ref key } if key == "~"));
    }

    #[test]
    fn test_non_finite_floats_are_not_null() {
        let nan = Boxfile::parse("data.db:\n  ratio: .nan\n").unwrap();
        let null = Boxfile::parse("data.db:\n  ratio: ~\n").unwrap();
        assert!(!nan.node("data.db").equal(&null.node("data.db")));
        assert!(
            nan.node("data.db")
                .equal(&Node::new(json!({"ratio": ".nan"})))
        );

        let inf = Boxfile::parse("data.db:\n  ratio: .inf\n").unwrap();
        let neg = Boxfile::parse("data.db:\n  ratio: -.inf\n").unwrap();
        assert!(!inf.node("data.db").equal(&neg.node("data.db")));
        assert!(!inf.node("data.db").equal(&null.node("data.db")));
    }
}
