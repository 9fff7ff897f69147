use std::fs::File;
use std::io::{BufReader, ErrorKind as IoErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::Encoding;

use crate::byte_order::ReadBytesExt;
use crate::config;
use crate::dbase::{DbaseFieldDescriptor, DbaseFieldType, DbaseFileHeader, FieldValue};
use crate::errors::{GeokitError, Result};

const DELETED: u8 = b'*';
const END_OF_FILE: u8 = 0x1a;

/// One physical record, deleted or not.
#[derive(Clone, Debug, PartialEq)]
pub struct DbaseRecord {
    pub deleted: bool,
    /// Decoded values in column order. Empty for deleted records, which are not decoded.
    pub values: Vec<FieldValue>,
}

/// Forward-only reader over the records of a DBF file.
///
/// Iterating yields the live records and skips deleted ones. Character fields
/// are decoded with the [`SHAPE_ENCODING`](config::SHAPE_ENCODING) code page.
#[derive(Debug)]
pub struct DbaseFileReader<R: Read + Seek> {
    reader: R,
    header: DbaseFileHeader,
    encoding: &'static Encoding,
    records_read: u32,
    buf: Vec<u8>,
}

impl DbaseFileReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> DbaseFileReader<R> {
    /// Parse the header of `reader` and position it at the first record.
    pub fn new(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let header = DbaseFileHeader::read_header(&mut reader)?;
        reader.seek(SeekFrom::Start(header.header_length() as u64))?;
        let buf = vec![0u8; header.record_length() as usize];
        Ok(DbaseFileReader {
            reader,
            header,
            encoding: config::shape_encoding()?,
            records_read: 0,
            buf,
        })
    }

    pub fn header(&self) -> &DbaseFileHeader {
        &self.header
    }

    /// Read the next physical record, including deleted ones.
    ///
    /// Returns `Ok(None)` once the declared record count is consumed, or at an
    /// end-of-file marker.
    pub fn read_entry(&mut self) -> Result<Option<DbaseRecord>> {
        if self.records_read >= self.header.num_records() {
            return Ok(None);
        }
        if !self.fill_record()? {
            tracing::warn!(
                declared = self.header.num_records(),
                found = self.records_read,
                "DBF file ends before its declared record count"
            );
            self.records_read = self.header.num_records();
            return Ok(None);
        }
        self.records_read += 1;
        self.decode_buffer().map(Some)
    }

    /// Read the record starting at byte `offset`.
    ///
    /// Returns `Ok(None)` when that record is marked deleted. Leaves the
    /// sequential position undefined.
    pub fn read_record_at_offset(&mut self, offset: u64) -> Result<Option<Vec<FieldValue>>> {
        self.reader.seek(SeekFrom::Start(offset))?;
        if !self.fill_record()? {
            return Err(GeokitError::format(
                "DBF",
                format!("no record at offset {offset}"),
            ));
        }
        let record = self.decode_buffer()?;
        Ok((!record.deleted).then_some(record.values))
    }

    /// Read one whole record, padding included, into the buffer.
    fn fill_record(&mut self) -> Result<bool> {
        let flag = match self.reader.read_u8() {
            Ok(flag) => flag,
            Err(e) if e.kind() == IoErrorKind::UnexpectedEof => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if flag == END_OF_FILE {
            return Ok(false);
        }
        self.buf[0] = flag;
        self.reader.read_exact(&mut self.buf[1..])?;
        Ok(true)
    }

    fn decode_buffer(&self) -> Result<DbaseRecord> {
        if self.buf[0] == DELETED {
            return Ok(DbaseRecord {
                deleted: true,
                values: Vec::new(),
            });
        }
        let mut values = Vec::with_capacity(self.header.num_fields());
        let mut start = 1;
        for field in self.header.fields() {
            let end = start + field.length as usize;
            values.push(decode_field(field, &self.buf[start..end], self.encoding)?);
            start = end;
        }
        Ok(DbaseRecord {
            deleted: false,
            values,
        })
    }
}

impl<R: Read + Seek> Iterator for DbaseFileReader<R> {
    type Item = Result<Vec<FieldValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_entry() {
                Ok(Some(record)) if record.deleted => continue,
                Ok(Some(record)) => return Some(Ok(record.values)),
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn trim_field(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
}

pub(crate) fn decode_field(
    field: &DbaseFieldDescriptor,
    raw: &[u8],
    encoding: &'static Encoding,
) -> Result<FieldValue> {
    match field.field_type {
        DbaseFieldType::Character => {
            let (text, _) = encoding.decode_without_bom_handling(raw);
            Ok(FieldValue::StringValue(
                text.trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
                    .to_string(),
            ))
        }
        DbaseFieldType::Logical => Ok(match raw.first() {
            Some(b'T' | b't' | b'Y' | b'y') => FieldValue::LogicalValue(true),
            Some(b'?') => FieldValue::Null,
            _ => FieldValue::LogicalValue(false),
        }),
        DbaseFieldType::Date => {
            let text = String::from_utf8_lossy(raw);
            let text = trim_field(&text);
            if text.is_empty() || text.bytes().all(|b| b == b'0') {
                return Ok(FieldValue::Null);
            }
            NaiveDate::parse_from_str(text, "%Y%m%d")
                .map(FieldValue::DateValue)
                .map_err(|e| {
                    GeokitError::format(
                        "DBF",
                        format!("field '{}' holds invalid date '{text}': {e}", field.name),
                    )
                })
        }
        DbaseFieldType::Numeric | DbaseFieldType::Float => {
            let text = String::from_utf8_lossy(raw);
            let text = trim_field(&text);
            // overflowed numbers are written as a run of '*'
            if text.is_empty() || text.bytes().all(|b| b == b'*') {
                return Ok(FieldValue::Null);
            }
            Ok(decode_number(field, text))
        }
        DbaseFieldType::Other(c) => Err(GeokitError::UnsupportedFieldType {
            field_type: c,
            field_name: field.name.clone(),
        }),
    }
}

fn decode_number(field: &DbaseFieldDescriptor, text: &str) -> FieldValue {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let fits_i32 = value.fract() == 0.0
                && value >= i32::MIN as f64
                && value <= i32::MAX as f64;
            if field.decimal_count == 0 && fits_i32 {
                FieldValue::IntegerValue(value as i32)
            } else {
                FieldValue::RealValue(value)
            }
        }
        _ => {
            tracing::debug!(field = %field.name, text, "numeric field kept as text");
            FieldValue::StringValue(text.to_string())
        }
    }
}
