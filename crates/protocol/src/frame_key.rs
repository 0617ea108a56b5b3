use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identity of a logical frame.
///
/// Every occurrence of the same function (or span operation) shares one key
/// no matter where it sits in the call tree, so the key is derived from what
/// the frame *is* and never from its position. Wraps `Arc<str>`: frame lists
/// repeat the same key many times and cloning must stay a refcount bump.
#[derive(Debug, Clone, Eq)]
pub struct FrameKey(Arc<str>);

impl FrameKey {
    /// Key for a symbol, qualified by its source file when one is known.
    pub fn symbol(name: &str, file: Option<&str>) -> Self {
        match file {
            Some(file) if !file.is_empty() => Self(Arc::from(format!("{file}:{name}"))),
            _ => Self(Arc::from(name)),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FrameKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<&str> for FrameKey {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Ord for FrameKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for FrameKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for FrameKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl std::borrow::Borrow<str> for FrameKey {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FrameKey {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for FrameKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for FrameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Hand-rolled so the `rc` serde feature is not needed.
impl Serialize for FrameKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FrameKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(Self(Arc::from(s.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_key_includes_file() {
        assert_eq!(FrameKey::symbol("render", Some("app.js")), "app.js:render");
        assert_eq!(FrameKey::symbol("render", None), "render");
        assert_eq!(FrameKey::symbol("render", Some("")), "render");
    }

    #[test]
    fn clones_compare_equal() {
        let a = FrameKey::from("main");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a, FrameKey::from(String::from("main")));
    }

    #[test]
    fn hashmap_lookup_by_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(FrameKey::from("key"), 7);
        assert_eq!(map.get("key"), Some(&7));
    }

    #[test]
    fn deserializes_escaped_strings() {
        let key: FrameKey = serde_json::from_str(r#""a\"b""#).expect("deserialize");
        assert_eq!(key, "a\"b");
        assert_eq!(serde_json::to_string(&key).expect("serialize"), r#""a\"b""#);
    }
}
