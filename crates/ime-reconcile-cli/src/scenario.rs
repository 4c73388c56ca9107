//! Scenario files: an initial document plus the native events to replay.
//!
//! ```toml
//! strategy = "diff-guarded-backward-delete"
//!
//! [selection]
//! anchor = { key = "t1", offset = 5 }
//! focus = { key = "t1", offset = 5 }
//!
//! [[blocks]]
//! key = "b1"
//! [[blocks.texts]]
//! key = "t1"
//! leaves = [{ text = "hello", marks = ["bold"] }]
//!
//! [[events]]
//! type = "input"
//! key = "t1"
//! offset = 4
//! text = "hell"
//! ```

use ime_reconcile_engine::{Block, Document, Key, Selection, Strategy, TextNode, TextRun};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse scenario at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Scenario selection points at unknown text node {0}")]
    UnknownSelectionKey(Key),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub strategy: Option<Strategy>,
    pub selection: Selection,
    pub blocks: Vec<BlockEntry>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

/// Keys left out of the file are generated; only text nodes that events
/// or the selection refer to need one.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockEntry {
    #[serde(default = "Key::generate")]
    pub key: Key,
    pub texts: Vec<TextEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextEntry {
    #[serde(default = "Key::generate")]
    pub key: Key,
    pub leaves: Vec<TextRun>,
}

/// One native event, as the host would deliver it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScenarioEvent {
    CompositionStart,
    CompositionEnd {
        #[serde(default)]
        data: String,
    },
    BeforeInput {
        data: String,
    },
    /// `textContent` of the rendered leaf after the browser changed it
    Input {
        key: Key,
        #[serde(default)]
        leaf: usize,
        offset: usize,
        text: String,
    },
    /// Next animation frame: deferred checks run
    Frame,
}

impl fmt::Display for ScenarioEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioEvent::CompositionStart => write!(f, "composition-start"),
            ScenarioEvent::CompositionEnd { data } => write!(f, "composition-end {data:?}"),
            ScenarioEvent::BeforeInput { data } => write!(f, "before-input {data:?}"),
            ScenarioEvent::Input {
                key,
                leaf,
                offset,
                text,
            } => write!(f, "input {key}[{leaf}]@{offset} {text:?}"),
            ScenarioEvent::Frame => write!(f, "frame"),
        }
    }
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::parse(&content).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let known = |key: &Key| {
            self.blocks
                .iter()
                .flat_map(|block| &block.texts)
                .any(|text| &text.key == key)
        };
        for end in [&self.selection.anchor, &self.selection.focus] {
            if !known(&end.key) {
                return Err(ScenarioError::UnknownSelectionKey(end.key.clone()));
            }
        }
        Ok(())
    }

    pub fn document(&self) -> Document {
        let blocks = self
            .blocks
            .iter()
            .map(|block| {
                let texts = block
                    .texts
                    .iter()
                    .map(|text| TextNode::new(text.key.clone(), text.leaves.clone()))
                    .collect();
                Block::new(block.key.clone(), texts)
            })
            .collect();
        Document::new(blocks)
    }
}
