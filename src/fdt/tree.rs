// ABOUTME: Devicetree node structure and tree construction from tokens
// ABOUTME: Provides lookup helpers and depth-first traversal

use super::error::FdtError;
use super::tokens::FdtToken;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// A named node in the decoded tree.
///
/// Property values stay as the raw bytes the decoder produced; interpreting
/// them (strings, cells, opaque data) is left to the consumer. The tree is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdtNode {
    /// Node name, empty for the root
    pub name: String,
    /// Absolute path, `/` for the root
    pub path: String,
    /// Property name to raw value bytes; last write wins on duplicate names
    pub properties: BTreeMap<String, Vec<u8>>,
    /// Child nodes in stream order
    pub children: Vec<FdtNode>,
}

impl FdtNode {
    fn new(name: String, path: String) -> Self {
        Self {
            name,
            path,
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Build the tree from a decoded token sequence.
    ///
    /// The token stream has already validated nesting balance, so any stack
    /// violation observed here is a logic defect and surfaces as
    /// [`FdtError::InternalInconsistency`] rather than being swallowed.
    pub fn from_tokens<I>(tokens: I) -> Result<Self, FdtError>
    where
        I: IntoIterator<Item = Result<FdtToken, FdtError>>,
    {
        let mut stack: Vec<FdtNode> = Vec::new();

        for token in tokens {
            match token? {
                FdtToken::BeginNode { name, path } => {
                    stack.push(FdtNode::new(name, path));
                }
                FdtToken::Property { name, value } => {
                    let node = stack
                        .last_mut()
                        .ok_or(FdtError::InternalInconsistency {
                            reason: "property token with no open node",
                        })?;
                    node.properties.insert(name, value);
                }
                FdtToken::EndNode => match stack.len() {
                    0 => {
                        return Err(FdtError::InternalInconsistency {
                            reason: "end-node token with no open node",
                        });
                    }
                    // the root stays on the stack until the end token
                    1 => {}
                    _ => {
                        if let Some(completed) = stack.pop()
                            && let Some(parent) = stack.last_mut()
                        {
                            parent.children.push(completed);
                        }
                    }
                },
                FdtToken::Nop => {}
                FdtToken::End => {
                    let root = stack.pop();
                    return match (root, stack.is_empty()) {
                        (Some(root), true) => Ok(root),
                        _ => Err(FdtError::InternalInconsistency {
                            reason: "structure did not reduce to a single root",
                        }),
                    };
                }
            }
        }

        Err(FdtError::InternalInconsistency {
            reason: "token sequence ended without an end token",
        })
    }

    /// Raw bytes of a property, if present
    pub fn property(&self, name: &str) -> Option<&[u8]> {
        self.properties.get(name).map(Vec::as_slice)
    }

    /// Check if a property exists
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Find a direct child by exact name
    pub fn find_child(&self, name: &str) -> Option<&FdtNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Find a node by absolute path (e.g. `/soc/uart@10000000`).
    ///
    /// Segments match exactly, unit address included.
    pub fn find_node(&self, path: &str) -> Option<&FdtNode> {
        if path.is_empty() || path == "/" {
            return Some(self);
        }

        let mut node = self;
        for segment in path.strip_prefix('/').unwrap_or(path).split('/') {
            node = node.find_child(segment)?;
        }
        Some(node)
    }

    /// Get iterator over all nodes (depth-first traversal)
    pub fn iter_nodes(&self) -> NodeIterator<'_> {
        NodeIterator::new(self)
    }

    /// Get iterator over this node's properties
    pub fn iter_properties(&self) -> btree_map::Iter<'_, String, Vec<u8>> {
        self.properties.iter()
    }

    /// Get iterator over child nodes
    pub fn iter_children(&self) -> core::slice::Iter<'_, FdtNode> {
        self.children.iter()
    }
}

/// Iterator for depth-first traversal of decoded tree nodes
pub struct NodeIterator<'a> {
    stack: Vec<&'a FdtNode>,
}

impl<'a> NodeIterator<'a> {
    fn new(root: &'a FdtNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = &'a FdtNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // push children in reverse so the first child is visited next
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
