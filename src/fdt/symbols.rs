// ABOUTME: Symbol table derived from the /__symbols__ node
// ABOUTME: Maps firmware labels to absolute node paths, both directions

use super::error::FdtError;
use super::tree::FdtNode;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::string::{String, ToString};

/// Conventional location of the symbol node
const SYMBOLS_PATH: &str = "/__symbols__";

/// Label to absolute-path mapping derived from `/__symbols__`.
///
/// The table is derived from a built tree and never persisted on its own; a
/// tree without a `/__symbols__` node yields an empty table and lookups
/// simply never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: BTreeMap<String, String>,
}

impl SymbolTable {
    /// Derive the table from a built tree.
    ///
    /// Each property of `/__symbols__` holds the NUL-terminated absolute
    /// path of the labelled node. A value without a terminator, or one that
    /// is not valid UTF-8, fails with [`FdtError::MalformedSymbolValue`];
    /// the already-built tree stays valid either way.
    pub fn from_tree(root: &FdtNode) -> Result<Self, FdtError> {
        let mut entries = BTreeMap::new();

        if let Some(node) = root.find_node(SYMBOLS_PATH) {
            for (label, value) in node.iter_properties() {
                let nul = value.iter().position(|&b| b == 0).ok_or_else(|| {
                    FdtError::MalformedSymbolValue {
                        label: label.clone(),
                    }
                })?;
                let path = core::str::from_utf8(&value[..nul]).map_err(|_| {
                    FdtError::MalformedSymbolValue {
                        label: label.clone(),
                    }
                })?;
                entries.insert(label.clone(), path.to_string());
            }
        }

        Ok(Self { entries })
    }

    /// Absolute path of the node a label refers to
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Reverse lookup: the label that names a given path
    pub fn label_for_path(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, target)| target.as_str() == path)
            .map(|(label, _)| label.as_str())
    }

    /// Iterate over (label, path) pairs in label order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no symbols
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
