//! # FAQ Knowledge Base
//!
//! This module loads the static question→answer knowledge base and exposes
//! the two matching strategies over it: a declared-order substring matcher
//! and an embedding-based semantic matcher.
//!
//! The source is a JSON object, either flat (`{question: answer}`) or
//! nested one level (`{category: {question: answer}}`). It is parsed into
//! an explicit tagged tree so traversal order is a documented property of
//! the data, not an accident of map iteration.

pub mod semantic;
pub mod substring;

use crate::errors::FaqLoadError;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// A node in the FAQ source tree.
///
/// `Leaf` is a direct answer; `Category` is a named group of child nodes
/// in declared order. The matcher walks this tree depth-first, so "first
/// match wins" means first in the order the JSON document declares.
#[derive(Debug, Clone, PartialEq)]
pub enum FaqNode {
    Leaf(String),
    Category(Vec<(String, FaqNode)>),
}

impl Default for FaqNode {
    fn default() -> Self {
        FaqNode::Category(Vec::new())
    }
}

impl FaqNode {
    fn from_value(key: &str, value: &Value) -> Result<FaqNode, FaqLoadError> {
        match value {
            Value::String(answer) => Ok(FaqNode::Leaf(answer.clone())),
            Value::Object(map) => {
                let mut children = Vec::with_capacity(map.len());
                for (child_key, child) in map {
                    children.push((child_key.clone(), FaqNode::from_value(child_key, child)?));
                }
                Ok(FaqNode::Category(children))
            }
            _ => Err(FaqLoadError::InvalidValue(key.to_string())),
        }
    }
}

/// A single question/answer pair, immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    /// The enclosing category label, if the entry came from a nested source.
    pub category: Option<String>,
}

/// The flattened, order-preserving FAQ knowledge base.
///
/// Built once at startup and treated as read-only shared state for the
/// process lifetime. Question strings are unique within the index;
/// a duplicate question later in the document replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct FaqIndex {
    tree: FaqNode,
    entries: Vec<FaqEntry>,
}

impl FaqIndex {
    /// Parses a FAQ source from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, FaqLoadError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(FaqLoadError::NotAnObject);
        }
        let tree = FaqNode::from_value("", &value)?;
        let entries = flatten(&tree);
        info!(entries = entries.len(), "Loaded FAQ knowledge base");
        Ok(Self { tree, entries })
    }

    /// Loads a FAQ source from a JSON file. Fatal at startup on failure.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, FaqLoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| FaqLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The source tree, for matchers that need declared-order traversal.
    pub fn tree(&self) -> &FaqNode {
        &self.tree
    }

    /// The flattened entries in declared order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flattens the source tree into a sequence of entries, dropping category
/// labels from the answer text but keeping them on the entry. Duplicate
/// questions are last-write-wins, preserving the position of the first
/// occurrence.
fn flatten(tree: &FaqNode) -> Vec<FaqEntry> {
    let mut entries: Vec<FaqEntry> = Vec::new();
    walk(tree, None, &mut entries);
    entries
}

fn walk(node: &FaqNode, category: Option<&str>, entries: &mut Vec<FaqEntry>) {
    if let FaqNode::Category(children) = node {
        for (key, child) in children {
            match child {
                FaqNode::Leaf(answer) => {
                    let entry = FaqEntry {
                        question: key.clone(),
                        answer: answer.clone(),
                        category: category.map(String::from),
                    };
                    match entries.iter_mut().find(|e| e.question == *key) {
                        Some(existing) => *existing = entry,
                        None => entries.push(entry),
                    }
                }
                FaqNode::Category(_) => walk(child, Some(key), entries),
            }
        }
    }
}
