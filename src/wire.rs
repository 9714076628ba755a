//! Binary wire codec (the transmitted format).
//!
//! Layout, fixed as wire contract v1 (no version tag; the header's two
//! bits are the only extensibility point):
//!
//! ```text
//! [header: 1 byte]            bit 0 = reversed, bit 1 = empty
//! [id block]                  varint count, then varint ids
//! [unresolved block]          varint owner count, then per owner:
//!                             string, varint entry count, then per
//!                             entry: string + varint count
//! [pending block]             varint count, then per entry:
//!                             varint id + varint count
//! ```
//!
//! When `empty` is set the record stops after the header byte. When
//! `reversed` is set the id block holds the universe ids *excluded*
//! from the resolved set rather than its members; the resolved set is
//! frequently near-total, so sending the smaller of the two sides
//! halves the average packet. Both ends must therefore agree on the
//! universe (see [`Catalog::universe`]).
//!
//! Varints are the standard little-endian 7-bit-group scheme with a
//! continuation bit on all but the final byte; strings are
//! varint-length-prefixed UTF-8. No length limit is enforced here;
//! callers may impose one on the underlying reader.
//!
//! Decoding is all-or-nothing: malformed input yields a
//! [`DecodeError`] and no partial state, and callers discard the
//! packet rather than retry.

use std::collections::{HashMap, HashSet};
use std::io::{self, Read, Write};

use crate::catalog::Catalog;
use crate::error::DecodeError;
use crate::id::EntryId;
use crate::pair::NameCount;
use crate::research::ResearchData;
use crate::share::ResearchShare;

const HEADER_REVERSED: u8 = 1 << 0;
const HEADER_EMPTY: u8 = 1 << 1;

/// Writes a u32 as little-endian 7-bit groups with continuation bits.
pub(crate) fn write_varint(writer: &mut impl Write, mut value: u32) -> io::Result<()> {
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            return writer.write_all(&[group]);
        }
        writer.write_all(&[group | 0x80])?;
    }
}

/// Reads a u32 written by [`write_varint`].
///
/// Rejects sequences longer than five groups or carrying bits past the
/// 32nd.
pub(crate) fn read_varint(reader: &mut impl Read) -> Result<u32, DecodeError> {
    let mut value = 0u32;
    let mut shift = 0u32;
    loop {
        let byte = read_byte(reader)?;
        if shift == 28 && (byte & 0xf0) != 0 {
            return Err(DecodeError::VarIntTooLong);
        }
        value |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift > 28 {
            return Err(DecodeError::VarIntTooLong);
        }
    }
}

/// Writes a varint-length-prefixed UTF-8 string.
pub(crate) fn write_string(writer: &mut impl Write, value: &str) -> io::Result<()> {
    let len = u32::try_from(value.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long for wire"))?;
    write_varint(writer, len)?;
    writer.write_all(value.as_bytes())
}

/// Reads a string written by [`write_string`].
pub(crate) fn read_string(reader: &mut impl Read) -> Result<String, DecodeError> {
    let len = read_varint(reader)? as usize;
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(String::from_utf8(buf)?)
}

fn read_byte(reader: &mut impl Read) -> Result<u8, DecodeError> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

impl ResearchData {
    /// Encodes this record for transmission.
    ///
    /// Ids and owners are written in sorted order so identical records
    /// produce identical bytes.
    ///
    /// # Errors
    /// Propagates writer failures.
    pub fn encode(&self, writer: &mut impl Write, catalog: &dyn Catalog) -> io::Result<()> {
        let universe = catalog.universe();
        let reversed = self.resolved_count() > universe.len() / 2;
        let empty = self.is_empty();

        let mut header = 0u8;
        if reversed {
            header |= HEADER_REVERSED;
        }
        if empty {
            header |= HEADER_EMPTY;
        }
        writer.write_all(&[header])?;
        if empty {
            return Ok(());
        }

        if reversed {
            let missing: Vec<EntryId> = universe
                .into_iter()
                .filter(|&id| !self.contains_resolved(id))
                .collect();
            write_varint(writer, missing.len() as u32)?;
            for id in missing {
                write_varint(writer, id.raw())?;
            }
        } else {
            let mut resolved: Vec<EntryId> = self.resolved_ids().collect();
            resolved.sort_unstable();
            write_varint(writer, resolved.len() as u32)?;
            for id in resolved {
                write_varint(writer, id.raw())?;
            }
        }

        let mut owners: Vec<(&str, &[NameCount])> = self.unresolved().collect();
        owners.sort_unstable_by(|a, b| a.0.cmp(b.0));
        write_varint(writer, owners.len() as u32)?;
        for (owner, list) in owners {
            write_string(writer, owner)?;
            write_varint(writer, list.len() as u32)?;
            for pair in list {
                write_string(writer, pair.name())?;
                write_varint(writer, pair.count())?;
            }
        }

        let mut pending: Vec<(EntryId, u32)> = self.pending().collect();
        pending.sort_unstable_by_key(|&(id, _)| id);
        write_varint(writer, pending.len() as u32)?;
        for (id, count) in pending {
            write_varint(writer, id.raw())?;
            write_varint(writer, count)?;
        }

        Ok(())
    }

    /// Decodes a transmitted record.
    ///
    /// The sender is trusted to have de-duplicated unresolved lists;
    /// they are rebuilt verbatim.
    ///
    /// # Errors
    /// Fails on truncation, over-long varints, or invalid UTF-8. No
    /// partial state survives a failure.
    pub fn decode(reader: &mut impl Read, catalog: &dyn Catalog) -> Result<Self, DecodeError> {
        let header = read_byte(reader)?;
        let reversed = header & HEADER_REVERSED != 0;
        let empty = header & HEADER_EMPTY != 0;
        if empty {
            return Ok(Self::new());
        }

        let mut resolved = HashSet::new();
        if reversed {
            let count = read_varint(reader)?;
            let mut missing = HashSet::new();
            for _ in 0..count {
                missing.insert(EntryId::new(read_varint(reader)?));
            }
            for id in catalog.universe() {
                if !missing.contains(&id) {
                    resolved.insert(id);
                }
            }
        } else {
            let count = read_varint(reader)?;
            for _ in 0..count {
                resolved.insert(EntryId::new(read_varint(reader)?));
            }
        }

        let mut unresolved: HashMap<String, Vec<NameCount>> = HashMap::new();
        let owner_count = read_varint(reader)?;
        for _ in 0..owner_count {
            let owner = read_string(reader)?;
            let entry_count = read_varint(reader)?;
            let mut list = Vec::new();
            for _ in 0..entry_count {
                let name = read_string(reader)?;
                let count = read_varint(reader)?;
                list.push(NameCount::new(name, count));
            }
            unresolved.insert(owner, list);
        }

        let mut pending: HashMap<EntryId, u32> = HashMap::new();
        let pending_count = read_varint(reader)?;
        for _ in 0..pending_count {
            let id = EntryId::new(read_varint(reader)?);
            let count = read_varint(reader)?;
            pending.insert(id, count);
        }

        Ok(Self::from_parts(resolved, unresolved, pending))
    }
}

impl ResearchShare {
    /// Encodes the share: the research record followed by the
    /// attribution string.
    ///
    /// # Errors
    /// Propagates writer failures.
    pub fn encode(&self, writer: &mut impl Write, catalog: &dyn Catalog) -> io::Result<()> {
        self.data().encode(writer, catalog)?;
        write_string(writer, self.source_player())
    }

    /// Decodes a transmitted share.
    ///
    /// # Errors
    /// Fails as [`ResearchData::decode`] does.
    pub fn decode(reader: &mut impl Read, catalog: &dyn Catalog) -> Result<Self, DecodeError> {
        let data = ResearchData::decode(reader, catalog)?;
        let player = read_string(reader)?;
        Ok(Self::from_parts(data, player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn varint_bytes(value: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, value).unwrap();
        buf
    }

    #[test]
    fn test_varint_encoding() {
        assert_eq!(varint_bytes(0), [0x00]);
        assert_eq!(varint_bytes(127), [0x7f]);
        assert_eq!(varint_bytes(128), [0x80, 0x01]);
        assert_eq!(varint_bytes(300), [0xac, 0x02]);
        assert_eq!(varint_bytes(u32::MAX), [0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_varint_roundtrip() {
        for value in [0, 1, 127, 128, 255, 300, 16_384, 2_097_151, u32::MAX] {
            let bytes = varint_bytes(value);
            let decoded = read_varint(&mut Cursor::new(bytes)).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_varint_rejects_overlong() {
        // Six continuation groups never terminate a u32.
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let err = read_varint(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, DecodeError::VarIntTooLong));

        // Fifth group carries bits past the 32nd.
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x10];
        let err = read_varint(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, DecodeError::VarIntTooLong));
    }

    #[test]
    fn test_varint_truncated() {
        let err = read_varint(&mut Cursor::new([0x80u8])).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_string_roundtrip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "gadgets").unwrap();
        write_string(&mut buf, "").unwrap();
        write_string(&mut buf, "pickaxe \u{2692}").unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_string(&mut cursor).unwrap(), "gadgets");
        assert_eq!(read_string(&mut cursor).unwrap(), "");
        assert_eq!(read_string(&mut cursor).unwrap(), "pickaxe \u{2692}");
    }

    #[test]
    fn test_string_truncated() {
        let mut buf = Vec::new();
        write_string(&mut buf, "gadgets").unwrap();
        buf.truncate(4);
        let err = read_string(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 2).unwrap();
        buf.extend_from_slice(&[0xc3, 0x28]);
        let err = read_string(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }
}
