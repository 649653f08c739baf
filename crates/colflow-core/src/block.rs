//! The block model supplied by the document layer.
//!
//! Blocks are owned by the caller; the engine only reads them. All builder
//! methods construct new values rather than mutating shared state.

use indexmap::IndexMap;

/// Unique identifier for a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockId(pub String);

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId(s)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A property value attached to a block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl PropValue {
    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// An atomic content unit from the document model.
///
/// The `kind` tag ("paragraph", "heading", "image", ...) selects the height
/// heuristic; unknown kinds fall back to the default rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// Unique ID within the document
    pub id: BlockId,
    /// Type tag selecting the height heuristic
    pub kind: String,
    /// Textual content (empty for non-text blocks)
    pub text: String,
    /// Nested blocks (list items, table rows)
    pub children: Vec<Block>,
    /// Free-form properties (image dimensions, heading level, ...)
    pub properties: IndexMap<String, PropValue>,
}

impl Block {
    /// Create a block with the given id and kind.
    pub fn new(id: impl Into<BlockId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            text: String::new(),
            children: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Set the textual content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the nested blocks.
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Attach a property.
    pub fn with_property(mut self, name: &str, value: PropValue) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Look up a numeric property.
    pub fn number_property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).and_then(PropValue::as_number)
    }

    /// Look up a text property.
    pub fn text_property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(PropValue::as_text)
    }

    /// Length of the textual content in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}
