// ABOUTME: DTB header structure definitions and validation
// ABOUTME: Handles the 40-byte devicetree blob header format

use super::error::FdtError;

/// DTB header structure (40 bytes total)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdtHeader {
    /// Magic number (should be 0xd00dfeed)
    pub magic: u32,
    /// Total size of the DTB
    pub totalsize: u32,
    /// Offset to structure block
    pub off_dt_struct: u32,
    /// Offset to strings block
    pub off_dt_strings: u32,
    /// Offset to memory reservation block
    pub off_mem_rsvmap: u32,
    /// Version of the DTB format
    pub version: u32,
    /// Last compatible version
    pub last_comp_version: u32,
    /// Boot CPU ID
    pub boot_cpuid_phys: u32,
    /// Size of strings block
    pub size_dt_strings: u32,
    /// Size of structure block
    pub size_dt_struct: u32,
}

impl FdtHeader {
    /// DTB magic number constant
    pub const MAGIC: u32 = 0xd00d_feed;

    /// Header size in bytes
    pub const SIZE: usize = 40;

    /// Lowest format version this decoder accepts
    pub const MIN_VERSION: u32 = 17;

    /// Required last compatible version
    pub const LAST_COMP_VERSION: u32 = 16;

    /// Parse and validate the DTB header at the start of `input`.
    ///
    /// Validation runs in a fixed order so that each malformed buffer fails
    /// with the most specific error: magic, declared size, version pair,
    /// section ordering, section bounds, then section alignment.
    pub fn parse(input: &[u8]) -> Result<Self, FdtError> {
        if input.len() < Self::SIZE {
            return Err(FdtError::TruncatedHeader {
                expected: Self::SIZE,
                actual: input.len(),
            });
        }

        let read_be_u32 = |offset: usize| -> u32 {
            u32::from_be_bytes(
                input[offset..offset + 4]
                    .try_into()
                    .expect("slice should be exactly 4 bytes"),
            )
        };

        let header = FdtHeader {
            magic: read_be_u32(0),
            totalsize: read_be_u32(4),
            off_dt_struct: read_be_u32(8),
            off_dt_strings: read_be_u32(12),
            off_mem_rsvmap: read_be_u32(16),
            version: read_be_u32(20),
            last_comp_version: read_be_u32(24),
            boot_cpuid_phys: read_be_u32(28),
            size_dt_strings: read_be_u32(32),
            size_dt_struct: read_be_u32(36),
        };

        header.validate(input.len())?;

        log::debug!(
            "fdt header: version {} (last compatible {}), boot cpu {}, {} bytes total",
            header.version,
            header.last_comp_version,
            header.boot_cpuid_phys,
            header.totalsize
        );
        log::debug!(
            "fdt sections: rsvmap @ {:#x}, structure @ {:#x} ({} bytes), strings @ {:#x} ({} bytes)",
            header.off_mem_rsvmap,
            header.off_dt_struct,
            header.size_dt_struct,
            header.off_dt_strings,
            header.size_dt_strings
        );

        Ok(header)
    }

    /// Check every header invariant against the actual buffer length.
    fn validate(&self, buffer_len: usize) -> Result<(), FdtError> {
        if self.magic != Self::MAGIC {
            return Err(FdtError::InvalidMagic {
                observed: self.magic,
                expected: Self::MAGIC,
            });
        }

        if self.totalsize as usize != buffer_len {
            return Err(FdtError::SizeMismatch {
                declared: self.totalsize,
                actual: buffer_len,
            });
        }

        if self.version < Self::MIN_VERSION {
            return Err(FdtError::UnsupportedVersion {
                version: self.version,
                last_comp: self.last_comp_version,
            });
        }

        if self.last_comp_version != Self::LAST_COMP_VERSION {
            return Err(FdtError::UnsupportedVersion {
                version: self.version,
                last_comp: self.last_comp_version,
            });
        }

        if self.off_mem_rsvmap >= self.off_dt_struct || self.off_dt_struct >= self.off_dt_strings {
            return Err(FdtError::SectionOrderViolation {
                off_mem_rsvmap: self.off_mem_rsvmap,
                off_dt_struct: self.off_dt_struct,
                off_dt_strings: self.off_dt_strings,
            });
        }

        // u64 arithmetic so oversized offsets cannot wrap
        let strings_end = u64::from(self.off_dt_strings) + u64::from(self.size_dt_strings);
        if strings_end > u64::from(self.totalsize) {
            return Err(FdtError::SectionBoundsViolation {
                section: "strings",
                end: strings_end,
                limit: self.totalsize,
            });
        }

        let struct_end = u64::from(self.off_dt_struct) + u64::from(self.size_dt_struct);
        if struct_end > u64::from(self.off_dt_strings) {
            return Err(FdtError::SectionBoundsViolation {
                section: "structure",
                end: struct_end,
                limit: self.off_dt_strings,
            });
        }

        if self.off_mem_rsvmap % 8 != 0 {
            return Err(FdtError::AlignmentViolation {
                offset: self.off_mem_rsvmap,
                required: 8,
            });
        }

        if self.off_dt_struct % 4 != 0 {
            return Err(FdtError::AlignmentViolation {
                offset: self.off_dt_struct,
                required: 4,
            });
        }

        Ok(())
    }
}
