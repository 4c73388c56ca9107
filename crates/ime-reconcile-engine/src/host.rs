//! Boundary between the reconciler and the host editor.
//!
//! The host owns the native view, the document and the transaction machinery.
//! The reconciler only sees them through these traits.

use crate::model::{Key, MarkSet, Position, Selection, TextRun};
use serde::{Deserialize, Serialize};

/// What the host should do with its own default handling after a hook ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Propagation {
    /// Let the host run its default handler
    Continue,
    /// The reconciler already applied an edit; skip the default handler
    Stop,
}

/// A text node: an ordered sequence of runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub key: Key,
    pub leaves: Vec<TextRun>,
}

impl TextNode {
    pub fn new(key: impl Into<Key>, leaves: Vec<TextRun>) -> Self {
        Self {
            key: key.into(),
            leaves,
        }
    }

    pub fn leaves(&self) -> &[TextRun] {
        &self.leaves
    }

    /// Concatenated text of every run
    pub fn text(&self) -> String {
        self.leaves.iter().map(|leaf| leaf.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.leaves.iter().map(TextRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.iter().all(TextRun::is_empty)
    }
}

/// A block: an ordered sequence of text nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: Key,
    pub texts: Vec<TextNode>,
}

impl Block {
    pub fn new(key: impl Into<Key>, texts: Vec<TextNode>) -> Self {
        Self {
            key: key.into(),
            texts,
        }
    }

    pub fn last_text(&self) -> Option<&TextNode> {
        self.texts.last()
    }

    pub fn text(&self) -> String {
        self.texts.iter().map(TextNode::text).collect()
    }
}

/// Read access to the host's document tree
pub trait DocumentModel {
    /// Text node with the given key anywhere in the document
    fn descendant(&self, key: &Key) -> Option<&TextNode>;

    /// Nearest block enclosing the node with the given key
    fn closest_block(&self, key: &Key) -> Option<&Block>;
}

/// Maps a native (node, offset) pair to a document position
pub trait SelectionLocator<D: DocumentModel> {
    /// The host's native node handle
    type Node;

    fn resolve(&self, node: &Self::Node, offset: usize, document: &D) -> Option<Position>;
}

/// The mutation surface the reconciler drives.
///
/// Implementations apply each call transactionally against their current
/// value; `document()` and `selection()` always reflect prior calls.
pub trait EditTransaction {
    type Document: DocumentModel;

    fn document(&self) -> &Self::Document;

    fn selection(&self) -> &Selection;

    /// Insert at the current selection, replacing it when expanded
    fn insert_text(&mut self, text: &str);

    /// Replace `range` with `text` formatted with `marks`
    fn insert_text_at_range(&mut self, range: &Selection, text: &str, marks: &MarkSet);

    /// Delete the selection, or the single character before a caret
    fn delete_char_backward(&mut self);

    fn select(&mut self, selection: Selection);
}

/// Native composition event (`compositionstart` / `compositionend`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEvent {
    /// Committed text; empty for start events and cancelled compositions
    #[serde(default)]
    pub data: String,
}

impl CompositionEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Native `beforeinput` event carrying the text about to be inserted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeforeInputEvent {
    #[serde(default)]
    pub data: String,
}

impl BeforeInputEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Native "input changed" notification.
///
/// Carries the native selection anchor and the full `textContent` of the
/// native text node it sits in, as observed after the browser mutated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent<N> {
    pub anchor_node: N,
    pub anchor_offset: usize,
    pub text_content: String,
}

impl<N> InputEvent<N> {
    pub fn new(anchor_node: N, anchor_offset: usize, text_content: impl Into<String>) -> Self {
        Self {
            anchor_node,
            anchor_offset,
            text_content: text_content.into(),
        }
    }
}
