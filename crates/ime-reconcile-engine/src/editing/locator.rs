use serde::{Deserialize, Serialize};

use crate::host::{DocumentModel, SelectionLocator};
use crate::model::{Key, Position, TextRun};

/// A rendered leaf: each run of a text node is its own native text node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeLeaf {
    pub key: Key,
    pub leaf: usize,
}

impl NativeLeaf {
    pub fn new(key: impl Into<Key>, leaf: usize) -> Self {
        Self {
            key: key.into(),
            leaf,
        }
    }
}

/// Resolves an offset inside a rendered leaf to an offset in its text node
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafLocator;

impl<D: DocumentModel> SelectionLocator<D> for LeafLocator {
    type Node = NativeLeaf;

    fn resolve(&self, node: &NativeLeaf, offset: usize, document: &D) -> Option<Position> {
        let text = document.descendant(&node.key)?;
        let leaves = text.leaves();
        if node.leaf > 0 && node.leaf >= leaves.len() {
            return None;
        }

        let leaf_start: usize = leaves.iter().take(node.leaf).map(TextRun::len).sum();
        Some(Position::new(node.key.clone(), leaf_start + offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use crate::host::{Block, TextNode};
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::new(vec![Block::new(
            "b",
            vec![TextNode::new(
                "t",
                vec![TextRun::new("abc"), TextRun::with_marks("de", ["bold"])],
            )],
        )])
    }

    #[test]
    fn offsets_are_relative_to_the_leaf() {
        let doc = doc();
        assert_eq!(
            LeafLocator.resolve(&NativeLeaf::new("t", 0), 2, &doc),
            Some(Position::new("t", 2))
        );
        assert_eq!(
            LeafLocator.resolve(&NativeLeaf::new("t", 1), 1, &doc),
            Some(Position::new("t", 4))
        );
    }

    #[test]
    fn unknown_node_or_leaf_is_not_found() {
        let doc = doc();
        assert_eq!(LeafLocator.resolve(&NativeLeaf::new("x", 0), 0, &doc), None);
        assert_eq!(LeafLocator.resolve(&NativeLeaf::new("t", 2), 0, &doc), None);
    }
}
