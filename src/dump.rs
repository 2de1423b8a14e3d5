//! Hex dump of raw storage for debugging.
//!
//! ```text
//! storage:
//!   0000  ec 00 00 00 00 24 b9 fc 3d ce ec 01 00 00 00 24  .....$..=......$
//!   0010  b9 fc 3d ce                                      ..=.
//! ```

use std::fmt;

const BYTES_PER_LINE: usize = 16;

/// `Display` adapter that renders `bytes` as a hex dump.
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a> {
    desc: Option<&'a str>,
    bytes: &'a [u8],
}

impl<'a> HexDump<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { desc: None, bytes }
    }

    pub fn with_desc(mut self, desc: &'a str) -> Self {
        self.desc = Some(desc);
        self
    }
}

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(desc) = self.desc {
            writeln!(f, "{}:", desc)?;
        }

        if self.bytes.is_empty() {
            return writeln!(f, "  ZERO LENGTH");
        }

        for (line, chunk) in self.bytes.chunks(BYTES_PER_LINE).enumerate() {
            write!(f, "  {:04x} ", line * BYTES_PER_LINE)?;
            for byte in chunk {
                write!(f, " {:02x}", byte)?;
            }
            for _ in chunk.len()..BYTES_PER_LINE {
                write!(f, "   ")?;
            }
            write!(f, "  ")?;
            for &byte in chunk {
                let c = if (0x20..=0x7e).contains(&byte) {
                    byte as char
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

pub fn hex_dump(desc: Option<&str>, bytes: &[u8]) -> String {
    let dump = HexDump { desc, bytes };
    dump.to_string()
}
