use serde_json::Value;

/// A possibly-absent entry of a configuration snapshot.
///
/// Nodes compare structurally: two valid nodes are equal when their trees hold
/// the same keys and values, regardless of the order siblings were written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    value: Option<Value>,
}

impl Node {
    pub fn new(value: Value) -> Self {
        Self { value: Some(value) }
    }

    /// An absent node.
    pub fn invalid() -> Self {
        Self { value: None }
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// Deep structural equality between two nodes.
    ///
    /// Two invalid nodes are equal; a valid node never equals an invalid one.
    pub fn equal(&self, other: &Node) -> bool {
        self.value == other.value
    }

    /// Returns the string stored under `key`, if the node is a mapping holding one.
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.value.as_ref()?.get(key)?.as_str()
    }
}
