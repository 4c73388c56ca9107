//! Value types shared by the engine and its collaborators.
//!
//! Everything here is an immutable value: selection "builders" return new
//! selections rather than mutating in place, so a host can compute a
//! post-edit caret before it applies the edit that makes it valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque identifier of a node in the document tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A formatting tag applied to a run of text (e.g. `bold`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mark {
    pub kind: String,
}

impl Mark {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

pub type MarkSet = BTreeSet<Mark>;

/// A maximal span of text sharing one formatting state within a text node
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub marks: MarkSet,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }

    pub fn with_marks<I, M>(text: impl Into<String>, marks: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            text: text.into(),
            marks: marks.into_iter().map(Mark::new).collect(),
        }
    }

    /// Length in characters (the unit every offset in this crate uses)
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A location inside a specific text node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub key: Key,
    pub offset: usize,
}

impl Position {
    pub fn new(key: impl Into<Key>, offset: usize) -> Self {
        Self {
            key: key.into(),
            offset,
        }
    }

    /// Shift the offset by a signed amount, saturating at the node start
    pub fn moved_by(&self, n: isize) -> Self {
        Self {
            key: self.key.clone(),
            offset: self.offset.saturating_add_signed(n),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.offset)
    }
}

/// Directional selection: `anchor` is where it started, `focus` is the moving end
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed selection at `position`
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// True when focus precedes anchor within the same text node.
    /// Cross-node selections are taken in anchor-first order.
    pub fn is_backward(&self) -> bool {
        self.anchor.key == self.focus.key && self.focus.offset < self.anchor.offset
    }

    pub fn start(&self) -> &Position {
        if self.is_backward() {
            &self.focus
        } else {
            &self.anchor
        }
    }

    pub fn end(&self) -> &Position {
        if self.is_backward() {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn collapse_to_start(&self) -> Self {
        Self::caret(self.start().clone())
    }

    pub fn collapse_to_end(&self) -> Self {
        Self::caret(self.end().clone())
    }

    pub fn collapse_to(&self, position: Position) -> Self {
        Self::caret(position)
    }

    /// Shift both ends by `n` characters
    pub fn move_by(&self, n: isize) -> Self {
        Self {
            anchor: self.anchor.moved_by(n),
            focus: self.focus.moved_by(n),
        }
    }

    pub fn move_anchor_to(&self, key: &Key, offset: usize) -> Self {
        Self {
            anchor: Position::new(key.clone(), offset),
            focus: self.focus.clone(),
        }
    }

    pub fn move_focus_to(&self, key: &Key, offset: usize) -> Self {
        Self {
            anchor: self.anchor.clone(),
            focus: Position::new(key.clone(), offset),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.anchor)
        } else {
            write!(f, "{}..{}", self.anchor, self.focus)
        }
    }
}
