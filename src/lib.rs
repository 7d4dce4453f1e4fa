// ABOUTME: Strict Flattened Devicetree (DTB) decoder library
// ABOUTME: Validates the binary contract and builds an owned node tree with symbol resolution

//! # FDT Decoder
//!
//! Decode Device Tree Blob (DTB) buffers into an owned tree of named nodes
//! with raw property values. Designed for embedded systems with `no_std`
//! compatibility.
//!
//! The decoder is strict: the 40-byte header, section ordering, section
//! bounds, alignment and token nesting are all validated against the buffer,
//! and any violation surfaces as a typed [`FdtError`] carrying the byte
//! offset and the expected/observed values. Malformed input never yields a
//! partial tree.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use fdt_decoder::{FdtParser, FdtError};
//! # fn main() -> Result<(), FdtError> {
//! // Load your DTB data
//! let dtb_data = std::fs::read("path/to/your.dtb").unwrap();
//!
//! // Create parser and decode the tree
//! let parser = FdtParser::new(&dtb_data);
//! let tree = parser.parse_tree()?;
//!
//! for child in tree.iter_children() {
//!     println!("Node: {} ({})", child.name, child.path);
//! }
//!
//! // Resolve firmware labels through /__symbols__
//! let symbols = parser.symbol_table()?;
//! if let Some(path) = symbols.lookup("led0") {
//!     println!("led0 -> {path}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Strict validation**: every header invariant and token-stream rule is
//!   an explicit, typed failure condition
//! - **Lazy token stream**: single-pass [`TokenStream`] iterator with
//!   absolute path tracking for every node
//! - **`no_std` compatible**: works in embedded environments with `alloc`
//! - **Precise diagnostics**: errors carry byte offsets and expected vs.
//!   observed values
//!
//! ## Main Types
//!
//! - [`FdtParser`] - Main decoder interface
//! - [`FdtHeader`] - Validated DTB header
//! - [`FdtToken`] - Structure block tokens with resolved names
//! - [`FdtNode`] - Decoded tree nodes with properties and children
//! - [`SymbolTable`] - Label to node-path mapping from `/__symbols__`
//! - [`MemoryReservation`] - Memory reservation entries

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod fdt;


// Re-export main types
pub use fdt::{
    FdtError, FdtHeader, FdtNode, FdtParser, FdtToken, MemoryReservation, MemoryReservations,
    NodeIterator, SymbolTable, TokenStream,
};
