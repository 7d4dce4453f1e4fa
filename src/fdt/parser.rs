// ABOUTME: Decoder facade tying header, reservations, tokens, tree and symbols together
// ABOUTME: Each pipeline stage revalidates from the header; streams are not resumable

use super::error::FdtError;
use super::header::FdtHeader;
use super::memory::MemoryReservations;
use super::symbols::SymbolTable;
use super::tokens::TokenStream;
use super::tree::FdtNode;

/// Main devicetree blob decoder.
///
/// Wraps the raw buffer and exposes each decoding stage. Every stage starts
/// from a freshly validated header, so a failed or exhausted stream never
/// poisons later calls.
#[derive(Debug, Clone)]
pub struct FdtParser<'a> {
    data: &'a [u8],
}

impl<'a> FdtParser<'a> {
    /// Create a new parser from DTB data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Get the underlying data slice
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Parse and validate the DTB header
    pub fn parse_header(&self) -> Result<FdtHeader, FdtError> {
        FdtHeader::parse(self.data)
    }

    /// Iterate the memory reservation table
    pub fn memory_reservations(&self) -> Result<MemoryReservations<'a>, FdtError> {
        let header = self.parse_header()?;
        Ok(MemoryReservations::new(self.data, &header))
    }

    /// Decode the structure block as a lazy token stream
    pub fn tokens(&self) -> Result<TokenStream<'a>, FdtError> {
        let header = self.parse_header()?;
        Ok(TokenStream::new(self.data, &header))
    }

    /// Decode the complete tree rooted at `/`
    pub fn parse_tree(&self) -> Result<FdtNode, FdtError> {
        FdtNode::from_tokens(self.tokens()?)
    }

    /// Build the symbol table from the decoded tree
    pub fn symbol_table(&self) -> Result<SymbolTable, FdtError> {
        let tree = self.parse_tree()?;
        SymbolTable::from_tree(&tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_wraps_data() {
        let data = [0u8; 64];
        let parser = FdtParser::new(&data);
        assert_eq!(parser.data().len(), 64);
    }

    #[test]
    fn test_header_failure_propagates() {
        let data = [0u8; 64];
        let parser = FdtParser::new(&data);
        assert!(matches!(
            parser.parse_header(),
            Err(FdtError::InvalidMagic { .. })
        ));
        assert!(matches!(
            parser.parse_tree(),
            Err(FdtError::InvalidMagic { .. })
        ));
        assert!(matches!(
            parser.symbol_table(),
            Err(FdtError::InvalidMagic { .. })
        ));
    }
}
