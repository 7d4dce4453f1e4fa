// ABOUTME: Flattened devicetree blob decoding module
// ABOUTME: Provides no_std compatible strict DTB decoding functionality

pub mod error;
pub mod header;
pub mod memory;
pub mod parser;
pub mod symbols;
pub mod tokens;
pub mod tree;

pub use error::FdtError;
pub use header::FdtHeader;
pub use memory::{MemoryReservation, MemoryReservations};
pub use parser::FdtParser;
pub use symbols::SymbolTable;
pub use tokens::{FdtToken, TokenStream};
pub use tree::{FdtNode, NodeIterator};
