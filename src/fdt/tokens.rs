// ABOUTME: Structure block token stream decoding with path tracking
// ABOUTME: Single-pass state machine over tag-prefixed tokens and the string table

use super::error::FdtError;
use super::header::FdtHeader;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Structure block tokens with their payloads decoded.
///
/// Property names are already resolved through the strings block and node
/// paths are built from the ancestor stack, so consumers never touch the raw
/// buffer again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FdtToken {
    /// Start of a node: its name plus the absolute path at this point of the stream
    BeginNode {
        /// Node name, empty for the root
        name: String,
        /// Absolute path, `/` for the root
        path: String,
    },
    /// End of the most recently opened node
    EndNode,
    /// A property of the currently open node
    Property {
        /// Name resolved from the strings block
        name: String,
        /// Raw value bytes, owned
        value: Vec<u8>,
    },
    /// Padding token with no payload
    Nop,
    /// Terminal token; the stream ends after yielding it
    End,
}

impl FdtToken {
    /// Begin node token constant
    pub const FDT_BEGIN_NODE: u32 = 0x0000_0001;
    /// End node token constant
    pub const FDT_END_NODE: u32 = 0x0000_0002;
    /// Property token constant
    pub const FDT_PROP: u32 = 0x0000_0003;
    /// Nop token constant
    pub const FDT_NOP: u32 = 0x0000_0004;
    /// End of structure token constant
    pub const FDT_END: u32 = 0x0000_0009;
}

/// Round an offset up to the next 4-byte boundary
fn align4(offset: usize) -> usize {
    (offset + 3) & !3
}

fn is_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b',' | b'.' | b'_' | b'+' | b'-')
}

/// Check a node name against `[A-Za-z0-9,._+-]{1,31}` with an optional
/// `@unit-address` suffix drawn from the same character set.
fn validate_node_name(name: &str, offset: usize) -> Result<(), FdtError> {
    let (base, unit) = match name.split_once('@') {
        Some((base, unit)) => (base, Some(unit)),
        None => (name, None),
    };

    let base_ok = !base.is_empty() && base.len() <= 31 && base.bytes().all(is_name_char);
    let unit_ok = unit.is_none_or(|u| !u.is_empty() && u.bytes().all(is_name_char));

    if base_ok && unit_ok {
        Ok(())
    } else {
        Err(FdtError::InvalidNodeName {
            name: name.to_string(),
            offset,
        })
    }
}

/// Forward-only decoder for the structure block.
///
/// Yields tokens in stream order while tracking the nesting depth and the
/// ancestor name stack for path construction. The stream becomes permanently
/// exhausted after the terminal [`FdtToken::End`] or the first error; to
/// decode again, construct a fresh stream from the header.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    data: &'a [u8],
    cursor: usize,
    /// First byte past the structure block as declared by the header
    struct_end: usize,
    /// Hard read limit; the strings block must never be consumed as tokens
    limit: usize,
    strings_start: usize,
    strings_end: usize,
    depth: usize,
    /// Names of the open non-root ancestors, joined with `/` for paths
    segments: Vec<String>,
    finished: bool,
}

impl<'a> TokenStream<'a> {
    /// Create a token stream over the structure block of a validated blob
    pub fn new(data: &'a [u8], header: &FdtHeader) -> Self {
        let struct_start = header.off_dt_struct as usize;
        let struct_end = struct_start + header.size_dt_struct as usize;
        let strings_start = header.off_dt_strings as usize;
        Self {
            data,
            cursor: struct_start,
            struct_end,
            limit: struct_end.min(strings_start),
            strings_start,
            strings_end: strings_start + header.size_dt_strings as usize,
            depth: 0,
            segments: Vec::new(),
            finished: false,
        }
    }

    /// Current nesting depth (number of open nodes)
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn read_u32(&mut self) -> Result<u32, FdtError> {
        if self.cursor + 4 > self.limit {
            return Err(FdtError::TruncatedStream {
                offset: self.cursor,
                needed: 4,
                available: self.limit.saturating_sub(self.cursor),
            });
        }
        let value = u32::from_be_bytes(
            self.data[self.cursor..self.cursor + 4]
                .try_into()
                .expect("slice should be exactly 4 bytes"),
        );
        self.cursor += 4;
        Ok(value)
    }

    /// Read a NUL-terminated string at the cursor and pad to 4 bytes
    fn read_cstr(&mut self) -> Result<String, FdtError> {
        let start = self.cursor;
        let available = self.limit - start;
        let nul = self.data[start..self.limit]
            .iter()
            .position(|&b| b == 0)
            .ok_or(FdtError::TruncatedStream {
                offset: start,
                needed: available + 1,
                available,
            })?;
        let text = core::str::from_utf8(&self.data[start..start + nul])
            .map_err(|_| FdtError::InvalidStringEncoding { offset: start })?
            .to_string();
        self.cursor = align4(start + nul + 1);
        Ok(text)
    }

    /// Resolve a property name from the strings block
    fn resolve_name(&self, name_offset: u32) -> Result<String, FdtError> {
        let start = self.strings_start + name_offset as usize;
        if start >= self.strings_end {
            return Err(FdtError::TruncatedStream {
                offset: start,
                needed: 1,
                available: 0,
            });
        }
        let available = self.strings_end - start;
        let nul = self.data[start..self.strings_end]
            .iter()
            .position(|&b| b == 0)
            .ok_or(FdtError::TruncatedStream {
                offset: start,
                needed: available + 1,
                available,
            })?;
        core::str::from_utf8(&self.data[start..start + nul])
            .map(ToString::to_string)
            .map_err(|_| FdtError::InvalidStringEncoding { offset: start })
    }

    fn next_token(&mut self) -> Result<FdtToken, FdtError> {
        let token_offset = self.cursor;
        let tag = self.read_u32()?;

        let token = match tag {
            FdtToken::FDT_BEGIN_NODE => {
                let name = self.read_cstr()?;
                let path = if self.depth == 0 {
                    // only the anonymous root may open at depth 0
                    if !name.is_empty() {
                        return Err(FdtError::InvalidNodeName {
                            name,
                            offset: token_offset,
                        });
                    }
                    String::from("/")
                } else {
                    validate_node_name(&name, token_offset)?;
                    self.segments.push(name.clone());
                    format!("/{}", self.segments.join("/"))
                };
                self.depth += 1;
                FdtToken::BeginNode { name, path }
            }
            FdtToken::FDT_END_NODE => {
                if self.depth == 0 {
                    return Err(FdtError::UnbalancedNesting {
                        offset: token_offset,
                    });
                }
                self.depth -= 1;
                // the root contributed no segment, so this is a no-op for it
                self.segments.pop();
                FdtToken::EndNode
            }
            FdtToken::FDT_PROP => {
                if self.depth == 0 {
                    return Err(FdtError::PropertyOutsideNode {
                        offset: token_offset,
                    });
                }
                let len = self.read_u32()? as usize;
                let name_offset = self.read_u32()?;
                let name = self.resolve_name(name_offset)?;
                if self.cursor + len > self.limit {
                    return Err(FdtError::TruncatedStream {
                        offset: self.cursor,
                        needed: len,
                        available: self.limit - self.cursor,
                    });
                }
                let value = self.data[self.cursor..self.cursor + len].to_vec();
                self.cursor = align4(self.cursor + len);
                FdtToken::Property { name, value }
            }
            FdtToken::FDT_NOP => FdtToken::Nop,
            FdtToken::FDT_END => {
                if self.cursor != self.struct_end || self.depth != 0 {
                    return Err(FdtError::MalformedEnd {
                        offset: token_offset,
                        struct_end: self.struct_end,
                        depth: self.depth,
                    });
                }
                FdtToken::End
            }
            other => {
                return Err(FdtError::UnknownToken {
                    tag: other,
                    offset: token_offset,
                });
            }
        };

        log::trace!("token at {token_offset:#x}: {token:?}");
        Ok(token)
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Result<FdtToken, FdtError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(result, Ok(FdtToken::End) | Err(_)) {
            self.finished = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_constants() {
        assert_eq!(FdtToken::FDT_BEGIN_NODE, 0x0000_0001);
        assert_eq!(FdtToken::FDT_END_NODE, 0x0000_0002);
        assert_eq!(FdtToken::FDT_PROP, 0x0000_0003);
        assert_eq!(FdtToken::FDT_NOP, 0x0000_0004);
        assert_eq!(FdtToken::FDT_END, 0x0000_0009);
    }

    #[test]
    fn test_align4() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(1), 4);
        assert_eq!(align4(2), 4);
        assert_eq!(align4(3), 4);
        assert_eq!(align4(4), 4);
        assert_eq!(align4(5), 8);
    }

    #[test]
    fn test_node_name_plain() {
        assert!(validate_node_name("cpus", 0).is_ok());
        assert!(validate_node_name("interrupt-controller", 0).is_ok());
        assert!(validate_node_name("fsl,mpc8349emitx", 0).is_ok());
    }

    #[test]
    fn test_node_name_unit_address() {
        assert!(validate_node_name("uart@10000000", 0).is_ok());
        assert!(validate_node_name("cpu@0", 0).is_ok());
        assert!(validate_node_name("memory@80000000", 0).is_ok());
    }

    #[test]
    fn test_node_name_rejects_bad_characters() {
        assert!(validate_node_name("bad name", 0).is_err());
        assert!(validate_node_name("node/with/slash", 0).is_err());
        assert!(validate_node_name("uart@10@20", 0).is_err());
    }

    #[test]
    fn test_node_name_rejects_bad_lengths() {
        assert!(validate_node_name("", 0).is_err());
        assert!(validate_node_name("@100", 0).is_err());
        assert!(validate_node_name("uart@", 0).is_err());
        // 31 characters is the cap for the name part
        let max = "a".repeat(31);
        assert!(validate_node_name(&max, 0).is_ok());
        let too_long = "a".repeat(32);
        assert!(validate_node_name(&too_long, 0).is_err());
    }

    #[test]
    fn test_node_name_error_carries_context() {
        let err = validate_node_name("bad name", 0x58).unwrap_err();
        assert_eq!(
            err,
            FdtError::InvalidNodeName {
                name: String::from("bad name"),
                offset: 0x58
            }
        );
    }
}
