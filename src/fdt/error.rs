// ABOUTME: Error types for devicetree blob decoding
// ABOUTME: Every variant carries the byte offset and expected vs. observed context

use alloc::string::String;
use thiserror_no_std::Error;

/// Main error type for DTB decoding operations.
///
/// All failures are terminal: decoding the same malformed bytes again cannot
/// succeed, so callers should report the diagnostic and give up. Header-level
/// variants are detected before any structural decoding begins; structural
/// variants abort the token stream at the point of detection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FdtError {
    /// The buffer is shorter than the fixed-size header
    #[error("buffer holds {actual} bytes, shorter than the {expected}-byte header")]
    TruncatedHeader {
        /// Required header size
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },
    /// The magic field does not contain the DTB constant
    #[error("bad magic {observed:#010x}, expected {expected:#010x}")]
    InvalidMagic {
        /// Value read from the buffer
        observed: u32,
        /// The required magic constant
        expected: u32,
    },
    /// The declared total size disagrees with the buffer length
    #[error("header declares {declared} bytes but the buffer holds {actual}")]
    SizeMismatch {
        /// totalsize field from the header
        declared: u32,
        /// Actual buffer length
        actual: usize,
    },
    /// The blob's version pair is outside what this decoder handles
    #[error("version {version} with last compatible version {last_comp} is unsupported, need version >= 17 compatible with 16")]
    UnsupportedVersion {
        /// version field from the header
        version: u32,
        /// last_comp_version field from the header
        last_comp: u32,
    },
    /// The three sections are not laid out as reservation -> structure -> strings
    #[error("sections out of order: rsvmap @ {off_mem_rsvmap:#x}, structure @ {off_dt_struct:#x}, strings @ {off_dt_strings:#x}")]
    SectionOrderViolation {
        /// Memory reservation block offset
        off_mem_rsvmap: u32,
        /// Structure block offset
        off_dt_struct: u32,
        /// Strings block offset
        off_dt_strings: u32,
    },
    /// A section runs past the region the header allots to it
    #[error("{section} block ends at {end:#x}, past its limit {limit:#x}")]
    SectionBoundsViolation {
        /// Which section overran
        section: &'static str,
        /// Declared end of the section
        end: u64,
        /// First byte the section must not reach
        limit: u32,
    },
    /// A section offset violates its required alignment
    #[error("offset {offset:#x} is not aligned to {required} bytes")]
    AlignmentViolation {
        /// The misaligned offset
        offset: u32,
        /// Required alignment in bytes
        required: u32,
    },
    /// The structure block contains a tag outside the known set
    #[error("unknown token {tag:#010x} at offset {offset:#x}")]
    UnknownToken {
        /// The unrecognized tag value
        tag: u32,
        /// Byte offset of the tag
        offset: usize,
    },
    /// A node name does not match the permitted character set and length
    #[error("invalid node name {name:?} at offset {offset:#x}")]
    InvalidNodeName {
        /// The offending name
        name: String,
        /// Byte offset of the begin-node token
        offset: usize,
    },
    /// An end-node token arrived with no node open
    #[error("end-node token at offset {offset:#x} without a matching begin-node")]
    UnbalancedNesting {
        /// Byte offset of the token
        offset: usize,
    },
    /// A property token arrived outside any node
    #[error("property token at offset {offset:#x} outside any node")]
    PropertyOutsideNode {
        /// Byte offset of the token
        offset: usize,
    },
    /// The end token arrived early, late, or with nodes still open
    #[error("end token at offset {offset:#x} with nesting depth {depth}; structure block ends at {struct_end:#x}")]
    MalformedEnd {
        /// Byte offset of the token
        offset: usize,
        /// Declared end of the structure block
        struct_end: usize,
        /// Nodes still open when the token arrived
        depth: usize,
    },
    /// The structure block ran out of bytes before the end token
    #[error("structure block truncated at offset {offset:#x}: {needed} byte(s) required but {available} available")]
    TruncatedStream {
        /// Byte offset of the failed read
        offset: usize,
        /// Bytes the decoder needed
        needed: usize,
        /// Bytes actually available before the limit
        available: usize,
    },
    /// A name or string in the blob is not valid UTF-8
    #[error("string at offset {offset:#x} is not valid UTF-8")]
    InvalidStringEncoding {
        /// Byte offset of the string
        offset: usize,
    },
    /// A `/__symbols__` property value is not a NUL-terminated path string
    #[error("symbol {label:?} does not hold a NUL-terminated path")]
    MalformedSymbolValue {
        /// The symbol label whose value is malformed
        label: String,
    },
    /// A decoder invariant was broken; signals a logic defect, not bad input
    #[error("decoder invariant broken: {reason}")]
    InternalInconsistency {
        /// What went wrong
        reason: &'static str,
    },
}
