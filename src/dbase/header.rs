use std::io::{Read, Write};

use chrono::{Datelike, NaiveDate};

use crate::backpatch::FileHeader;
use crate::byte_order::{ReadBytesExt, WriteBytesExt};
use crate::dbase::{DbaseFieldDescriptor, DbaseFieldType};
use crate::errors::{GeokitError, Result};

pub(crate) const FILE_HEADER_LENGTH: u16 = 32;
pub(crate) const FIELD_DESCRIPTOR_LENGTH: u16 = 32;
const FIELD_TERMINATOR: u8 = 0x0d;
const DBASE_III: u8 = 0x03;
const MAX_NAME_LENGTH: usize = 10;
/// Most descriptors whose total header length still fits in a `u16`.
const MAX_FIELDS: usize =
    ((u16::MAX - FILE_HEADER_LENGTH - 1) / FIELD_DESCRIPTOR_LENGTH) as usize;

/// The fixed prologue and column layout of a DBF file.
///
/// `header_length` and `record_length` always describe the fields held here;
/// when a file declares larger values (trailing padding), those are kept.
#[derive(Clone, Debug, PartialEq)]
pub struct DbaseFileHeader {
    last_update: NaiveDate,
    num_records: u32,
    header_length: u16,
    record_length: u16,
    fields: Vec<DbaseFieldDescriptor>,
}

impl Default for DbaseFileHeader {
    fn default() -> Self {
        DbaseFileHeader::new(NaiveDate::default())
    }
}

impl DbaseFileHeader {
    pub fn new(last_update: NaiveDate) -> Self {
        DbaseFileHeader {
            last_update,
            num_records: 0,
            header_length: FILE_HEADER_LENGTH + 1,
            record_length: 1,
            fields: Vec::new(),
        }
    }

    pub fn last_update(&self) -> NaiveDate {
        self.last_update
    }

    pub fn set_last_update(&mut self, date: NaiveDate) {
        self.last_update = date;
    }

    pub fn num_records(&self) -> u32 {
        self.num_records
    }

    pub fn set_num_records(&mut self, num_records: u32) {
        self.num_records = num_records;
    }

    /// Byte offset of the first record.
    pub fn header_length(&self) -> u16 {
        self.header_length
    }

    /// Bytes per record, including the deleted flag.
    pub fn record_length(&self) -> u16 {
        self.record_length
    }

    pub fn fields(&self) -> &[DbaseFieldDescriptor] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Case-insensitive lookup of a column index.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    fn derived_header_length(&self) -> u32 {
        FILE_HEADER_LENGTH as u32 + FIELD_DESCRIPTOR_LENGTH as u32 * self.fields.len() as u32 + 1
    }

    fn derived_record_length(&self) -> u32 {
        1 + self.fields.iter().map(|f| f.length as u32).sum::<u32>()
    }

    fn recompute_lengths(&mut self) {
        // bounded by MAX_FIELDS
        self.header_length = self.derived_header_length().min(u16::MAX as u32) as u16;
        // bounded by add_column, a u16 record can hold 258 maximal fields
        self.record_length = self.derived_record_length().min(u16::MAX as u32) as u16;
    }

    /// Append a column. Logical columns are one byte wide and dates eight,
    /// whatever `length` says.
    pub fn add_column(
        &mut self,
        name: &str,
        field_type: DbaseFieldType,
        length: u8,
        decimal_count: u8,
    ) -> Result<()> {
        if name.is_empty() || name.len() > MAX_NAME_LENGTH || !name.is_ascii() {
            return Err(GeokitError::InvalidArgument {
                argument: "name",
                msg: format!("'{name}' must be 1 to {MAX_NAME_LENGTH} ASCII characters"),
            });
        }
        if self.fields.len() >= MAX_FIELDS {
            return Err(GeokitError::InvalidArgument {
                argument: "name",
                msg: format!("a DBF header holds at most {MAX_FIELDS} columns"),
            });
        }
        if self.field_index(name).is_some() {
            return Err(GeokitError::InvalidArgument {
                argument: "name",
                msg: format!("a column named '{name}' already exists"),
            });
        }
        let (length, decimal_count) = match field_type {
            DbaseFieldType::Logical => (1, 0),
            DbaseFieldType::Date => (8, 0),
            DbaseFieldType::Character => (length, 0),
            DbaseFieldType::Numeric | DbaseFieldType::Float => (length, decimal_count),
            DbaseFieldType::Other(c) => {
                return Err(GeokitError::UnsupportedFieldType {
                    field_type: c,
                    field_name: name.to_string(),
                })
            }
        };
        if length == 0 || length > 254 {
            return Err(GeokitError::InvalidArgument {
                argument: "length",
                msg: format!("field length {length} is not in 1..=254"),
            });
        }
        if decimal_count > 0 && decimal_count as u16 + 2 > length as u16 {
            return Err(GeokitError::InvalidArgument {
                argument: "decimal_count",
                msg: format!("{decimal_count} decimals do not fit a field of width {length}"),
            });
        }
        if self.derived_record_length() + length as u32 > u16::MAX as u32 {
            return Err(GeokitError::InvalidArgument {
                argument: "length",
                msg: "record length would exceed 65535 bytes".to_string(),
            });
        }
        self.fields.push(DbaseFieldDescriptor::new(
            name,
            field_type,
            length,
            decimal_count,
        ));
        self.recompute_lengths();
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<DbaseFieldDescriptor> {
        let index = self
            .field_index(name)
            .ok_or_else(|| GeokitError::InvalidArgument {
                argument: "name",
                msg: format!("no column named '{name}'"),
            })?;
        let removed = self.fields.remove(index);
        self.recompute_lengths();
        Ok(removed)
    }

    /// Parse the prologue and field descriptors, leaving `r` just after the terminator.
    ///
    /// Declared lengths smaller than what the descriptors imply are replaced by
    /// the derived values.
    pub fn read_header<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let version = r.read_u8()?;
        if version & 0x07 != DBASE_III {
            tracing::debug!(version, "DBF version byte is not dBASE III");
        }
        let (yy, mm, dd) = (r.read_u8()?, r.read_u8()?, r.read_u8()?);
        let last_update = NaiveDate::from_ymd_opt(1900 + yy as i32, mm as u32, dd as u32)
            .unwrap_or_else(|| {
                tracing::debug!(yy, mm, dd, "DBF last update date is invalid");
                NaiveDate::default()
            });
        let num_records = r.read_u32_le()?;
        let declared_header_length = r.read_u16_le()?;
        let declared_record_length = r.read_u16_le()?;
        let mut reserved = [0u8; 20];
        r.read_exact(&mut reserved)?;

        let mut fields = Vec::new();
        loop {
            let first = r.read_u8()?;
            // some writers terminate with NUL instead of 0x0D
            if first == FIELD_TERMINATOR || first == 0 {
                break;
            }
            if fields.len() == MAX_FIELDS {
                return Err(GeokitError::format(
                    "DBF",
                    format!("more than {MAX_FIELDS} field descriptors"),
                ));
            }
            let mut descriptor = [0u8; 31];
            r.read_exact(&mut descriptor)?;
            let mut raw_name = vec![first];
            raw_name.extend_from_slice(&descriptor[..10]);
            let name_end = raw_name.iter().position(|&b| b == 0).unwrap_or(raw_name.len());
            let name = String::from_utf8_lossy(&raw_name[..name_end]).trim().to_string();
            let field_type = DbaseFieldType::from_char(descriptor[10] as char);
            // descriptor[11..15] is the in-memory field address, meaningless on disk
            let length = descriptor[15];
            let decimal_count = descriptor[16];
            fields.push(DbaseFieldDescriptor {
                name,
                field_type,
                length,
                decimal_count,
            });
        }

        let mut header = DbaseFileHeader {
            last_update,
            num_records,
            header_length: 0,
            record_length: 0,
            fields,
        };
        header.recompute_lengths();
        if declared_header_length > header.header_length {
            header.header_length = declared_header_length;
        } else if declared_header_length < header.header_length {
            tracing::warn!(
                declared = declared_header_length,
                derived = header.header_length,
                "DBF header length is too small, using derived value"
            );
        }
        if declared_record_length as u32 > header.derived_record_length() {
            header.record_length = declared_record_length;
        } else if (declared_record_length as u32) < header.derived_record_length() {
            tracing::warn!(
                declared = declared_record_length,
                derived = header.record_length,
                "DBF record length is too small, using derived value"
            );
        }
        Ok(header)
    }

    /// Bytes between the field terminator and the first record.
    pub(crate) fn padding_after_descriptors(&self) -> u64 {
        (self.header_length as u32).saturating_sub(self.derived_header_length()) as u64
    }
}

impl FileHeader for DbaseFileHeader {
    fn write_header<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u8(DBASE_III)?;
        let year = (self.last_update.year() - 1900).clamp(0, 255) as u8;
        w.write_u8(year)?;
        w.write_u8(self.last_update.month() as u8)?;
        w.write_u8(self.last_update.day() as u8)?;
        w.write_u32_le(self.num_records)?;
        w.write_u16_le(self.header_length)?;
        w.write_u16_le(self.record_length)?;
        w.write_all(&[0u8; 20])?;

        let mut address = 1u32;
        for field in &self.fields {
            let mut name = [0u8; 11];
            let bytes = field.name.as_bytes();
            let n = bytes.len().min(MAX_NAME_LENGTH);
            name[..n].copy_from_slice(&bytes[..n]);
            w.write_all(&name)?;
            w.write_u8(field.field_type.as_char() as u8)?;
            w.write_u32_le(address)?;
            w.write_u8(field.length)?;
            w.write_u8(field.decimal_count)?;
            w.write_all(&[0u8; 14])?;
            address += field.length as u32;
        }
        w.write_u8(FIELD_TERMINATOR)?;
        for _ in 0..self.padding_after_descriptors() {
            w.write_u8(0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> DbaseFileHeader {
        let mut header = DbaseFileHeader::new(NaiveDate::from_ymd_opt(2005, 10, 20).unwrap());
        header
            .add_column("NAME", DbaseFieldType::Character, 20, 3)
            .unwrap();
        header
            .add_column("POP", DbaseFieldType::Numeric, 10, 0)
            .unwrap();
        header
            .add_column("ACTIVE", DbaseFieldType::Logical, 9, 0)
            .unwrap();
        header
            .add_column("FOUNDED", DbaseFieldType::Date, 1, 0)
            .unwrap();
        header
    }

    #[test]
    fn test_lengths() {
        let header = sample();
        assert_eq!(header.header_length(), 32 + 4 * 32 + 1);
        assert_eq!(header.record_length(), 1 + 20 + 10 + 1 + 8);
        assert_eq!(header.fields()[0].decimal_count, 0);
        assert_eq!(header.field_index("pop"), Some(1));
    }

    #[test]
    fn test_header_bytes_and_reparse() {
        let mut header = sample();
        header.set_num_records(42);
        let mut buf = Vec::new();
        header.write_header(&mut buf).unwrap();
        assert_eq!(buf.len(), header.header_length() as usize);
        assert_eq!(&buf[..4], &[0x03, 105, 10, 20]);
        assert_eq!(&buf[4..8], &42u32.to_le_bytes());
        assert_eq!(&buf[32..37], b"NAME\0");
        assert_eq!(buf[32 + 11], b'C');
        assert_eq!(*buf.last().unwrap(), 0x0d);

        let parsed = DbaseFileHeader::read_header(&mut Cursor::new(buf)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_column_validation() {
        let mut header = sample();
        assert!(header
            .add_column("pop", DbaseFieldType::Numeric, 5, 0)
            .is_err());
        assert!(header
            .add_column("ELEVENCHARS", DbaseFieldType::Numeric, 5, 0)
            .is_err());
        assert!(header
            .add_column("WIDE", DbaseFieldType::Character, 255, 0)
            .is_err());
        assert!(header
            .add_column("TIGHT", DbaseFieldType::Numeric, 3, 2)
            .is_err());
        let err = header
            .add_column("MEMO", DbaseFieldType::Other('M'), 10, 0)
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Unsupported);

        let removed = header.remove_column("Active").unwrap();
        assert_eq!(removed.field_type, DbaseFieldType::Logical);
        assert_eq!(header.record_length(), 1 + 20 + 10 + 8);
        assert!(header.remove_column("Active").is_err());
    }

    #[test]
    fn test_declared_lengths_are_rederived() {
        let header = sample();
        let mut buf = Vec::new();
        header.write_header(&mut buf).unwrap();
        // shrink the declared record length below the sum of field widths
        buf[10..12].copy_from_slice(&5u16.to_le_bytes());
        let parsed = DbaseFileHeader::read_header(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.record_length(), header.record_length());

        // a larger declared record length means trailing padding and is kept
        buf[10..12].copy_from_slice(&100u16.to_le_bytes());
        buf[8..10].copy_from_slice(&(header.header_length() + 3).to_le_bytes());
        let parsed = DbaseFileHeader::read_header(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.record_length(), 100);
        assert_eq!(parsed.padding_after_descriptors(), 3);
    }

    #[test]
    fn test_too_many_descriptors() {
        let mut buf = Vec::new();
        DbaseFileHeader::new(NaiveDate::from_ymd_opt(2005, 10, 20).unwrap())
            .write_header(&mut buf)
            .unwrap();
        // drop the terminator and declare one descriptor more than fits
        buf.pop();
        for i in 0..=MAX_FIELDS {
            let mut descriptor = [0u8; 32];
            let name = format!("F{i}");
            descriptor[..name.len()].copy_from_slice(name.as_bytes());
            descriptor[11] = b'C';
            descriptor[16] = 1;
            buf.extend_from_slice(&descriptor);
        }
        buf.push(FIELD_TERMINATOR);
        let err = DbaseFileHeader::read_header(&mut Cursor::new(&buf)).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Format);

        // one fewer is accepted and its header length still fits
        buf.truncate(buf.len() - 33);
        buf.push(FIELD_TERMINATOR);
        let header = DbaseFileHeader::read_header(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(header.num_fields(), MAX_FIELDS);
        assert_eq!(header.header_length() as usize, 32 + 32 * MAX_FIELDS + 1);
    }
}
