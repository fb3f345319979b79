use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// ClassConfig – class label → ordered specimen names
// ---------------------------------------------------------------------------

/// One experimental class and the specimens belonging to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGroup {
    pub label: String,
    pub specimens: Vec<String>,
}

/// The full class configuration.
///
/// Parsed from a JSON object such as
/// `{"wild-type": ["f1", "f2"], "mutant": ["f3"]}`.  Key order in the JSON
/// text is preserved: it defines the order classes (and their specimens)
/// are loaded, exported, and plotted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassConfig {
    classes: Vec<ClassGroup>,
}

impl ClassConfig {
    pub fn new(classes: Vec<ClassGroup>) -> Self {
        ClassConfig { classes }
    }

    /// Parse from a JSON object string.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Classes in configuration order.
    pub fn classes(&self) -> &[ClassGroup] {
        &self.classes
    }

    /// Total number of configured specimens across all classes.
    pub fn specimen_count(&self) -> usize {
        self.classes.iter().map(|c| c.specimens.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// A derived map deserializer would hand the keys over in whatever order the
// backing map type imposes; this visitor keeps the order of the JSON text.
impl<'de> Deserialize<'de> for ClassConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ClassConfigVisitor;

        impl<'de> Visitor<'de> for ClassConfigVisitor {
            type Value = ClassConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of class label to list of specimen names")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut classes = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, specimens)) =
                    access.next_entry::<String, Vec<String>>()?
                {
                    classes.push(ClassGroup { label, specimens });
                }
                Ok(ClassConfig { classes })
            }
        }

        deserializer.deserialize_map(ClassConfigVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
