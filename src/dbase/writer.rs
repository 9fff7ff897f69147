use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::Path;

use chrono::Datelike;
use encoding_rs::Encoding;

use crate::backpatch::BackpatchedFile;
use crate::config;
use crate::dbase::{DbaseFieldDescriptor, DbaseFieldType, DbaseFileHeader, FieldValue};
use crate::errors::{GeokitError, Result};

const LIVE: u8 = b' ';

/// Streaming DBF writer.
///
/// Columns are declared with [`add_column`](Self::add_column) before the first
/// record. The header is written with the first record, which locks the schema,
/// and rewritten with the final record count when the writer is closed or dropped.
pub struct DbaseFileWriter {
    file: BackpatchedFile<DbaseFileHeader>,
    encoding: &'static Encoding,
    header_written: bool,
    record: Vec<u8>,
}

impl DbaseFileWriter {
    /// Create (or truncate) a DBF file with no columns yet.
    ///
    /// The last-update stamp comes from [`config::dbf_date_last_update`].
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let header = DbaseFileHeader::new(config::dbf_date_last_update()?);
        Ok(DbaseFileWriter {
            file: BackpatchedFile::create(path, header)?,
            encoding: config::shape_encoding()?,
            header_written: false,
            record: Vec::new(),
        })
    }

    /// Open an existing DBF file to add records after its current ones.
    ///
    /// The schema is taken from the file and cannot be changed.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut header = DbaseFileHeader::read_header(&mut BufReader::new(File::open(path)?))?;
        // drop an end-of-file marker or anything else past the last record
        let data_end = header.header_length() as u64
            + header.record_length() as u64 * header.num_records() as u64;
        OpenOptions::new().write(true).open(path)?.set_len(data_end)?;
        header.set_last_update(config::dbf_date_last_update()?);
        tracing::debug!(
            path = %path.display(),
            records = header.num_records(),
            "appending to DBF file"
        );
        Ok(DbaseFileWriter {
            file: BackpatchedFile::append(path, header)?,
            encoding: config::shape_encoding()?,
            header_written: true,
            record: Vec::new(),
        })
    }

    pub fn header(&self) -> &DbaseFileHeader {
        self.file.header()
    }

    pub fn num_records(&self) -> u32 {
        self.file.header().num_records()
    }

    fn ensure_schema_open(&self, method_name: &'static str) -> Result<()> {
        if self.header_written {
            return Err(GeokitError::InvalidOperation {
                method_name,
                msg: "columns cannot change once the header has been written".to_string(),
            });
        }
        Ok(())
    }

    pub fn add_column(
        &mut self,
        name: &str,
        field_type: DbaseFieldType,
        length: u8,
        decimal_count: u8,
    ) -> Result<()> {
        self.ensure_schema_open("add_column")?;
        self.file
            .header_mut()
            .add_column(name, field_type, length, decimal_count)
    }

    pub fn remove_column(&mut self, name: &str) -> Result<DbaseFieldDescriptor> {
        self.ensure_schema_open("remove_column")?;
        self.file.header_mut().remove_column(name)
    }

    /// Append one record. `values` must hold one value per column, in column order.
    pub fn write(&mut self, values: &[FieldValue]) -> Result<()> {
        let header = self.file.header();
        if values.len() != header.num_fields() {
            return Err(GeokitError::InvalidArgument {
                argument: "values",
                msg: format!(
                    "expected {} values but got {}",
                    header.num_fields(),
                    values.len()
                ),
            });
        }
        self.record.clear();
        self.record.push(LIVE);
        for (field, value) in header.fields().iter().zip(values) {
            encode_field(field, value, self.encoding, &mut self.record)?;
        }
        self.record.resize(header.record_length() as usize, b' ');

        if !self.header_written {
            self.file.write_provisional_header()?;
            self.header_written = true;
        }
        self.file.write_all(&self.record)?;
        let header = self.file.header_mut();
        header.set_num_records(header.num_records() + 1);
        Ok(())
    }

    /// Backpatch the header with the final record count and release the file.
    pub fn close(self) -> Result<()> {
        self.file.close()
    }
}

fn mismatch(field: &DbaseFieldDescriptor, value: &FieldValue) -> GeokitError {
    GeokitError::InvalidArgument {
        argument: "values",
        msg: format!(
            "{value:?} cannot be stored in {} field '{}'",
            field.field_type, field.name
        ),
    }
}

/// Append exactly `field.length` bytes representing `value` to `out`.
pub(crate) fn encode_field(
    field: &DbaseFieldDescriptor,
    value: &FieldValue,
    encoding: &'static Encoding,
    out: &mut Vec<u8>,
) -> Result<()> {
    let width = field.length as usize;
    match field.field_type {
        DbaseFieldType::Character => {
            let text = match value {
                FieldValue::StringValue(s) => s.clone(),
                FieldValue::IntegerValue(v) => v.to_string(),
                FieldValue::RealValue(v) => v.to_string(),
                FieldValue::LogicalValue(v) => if *v { "T" } else { "F" }.to_string(),
                FieldValue::DateValue(d) => d.format("%Y%m%d").to_string(),
                FieldValue::Null => String::new(),
            };
            let bytes = encode_truncated(&text, encoding, width);
            out.extend_from_slice(&bytes);
            pad(out, width - bytes.len());
        }
        DbaseFieldType::Numeric | DbaseFieldType::Float => {
            let decimals = field.decimal_count as usize;
            let text = match value {
                FieldValue::IntegerValue(v) => format!("{:.*}", decimals, *v as f64),
                FieldValue::RealValue(v) if v.is_finite() => format!("{v:.decimals$}"),
                FieldValue::RealValue(_) => "*".repeat(width),
                FieldValue::StringValue(s) => s.trim().to_string(),
                FieldValue::Null => String::new(),
                _ => return Err(mismatch(field, value)),
            };
            if text.len() > width || !text.is_ascii() {
                out.extend(std::iter::repeat(b'*').take(width));
            } else {
                pad(out, width - text.len());
                out.extend_from_slice(text.as_bytes());
            }
        }
        DbaseFieldType::Logical => {
            let flag = match value {
                FieldValue::LogicalValue(true) => b'T',
                FieldValue::LogicalValue(false) => b'F',
                FieldValue::Null => b'?',
                _ => return Err(mismatch(field, value)),
            };
            out.push(flag);
            pad(out, width - 1);
        }
        DbaseFieldType::Date => match value {
            FieldValue::DateValue(d) => {
                // YYYYMMDD has room for four-digit years only
                if !(0..=9999).contains(&d.year()) {
                    return Err(GeokitError::OutOfRange {
                        name: "year",
                        value: d.year() as f64,
                        msg: format!("year of date in field '{}' must be 0..=9999", field.name),
                    });
                }
                if width < 8 {
                    return Err(GeokitError::format(
                        "DBF",
                        format!("date field '{}' is only {width} bytes wide", field.name),
                    ));
                }
                out.extend_from_slice(d.format("%Y%m%d").to_string().as_bytes());
                pad(out, width - 8);
            }
            FieldValue::Null => pad(out, width),
            _ => return Err(mismatch(field, value)),
        },
        DbaseFieldType::Other(c) => {
            return Err(GeokitError::UnsupportedFieldType {
                field_type: c,
                field_name: field.name.clone(),
            })
        }
    }
    Ok(())
}

fn pad(out: &mut Vec<u8>, n: usize) {
    out.extend(std::iter::repeat(b' ').take(n));
}

/// Encode `text`, dropping trailing characters until it fits in `width` bytes.
fn encode_truncated(text: &str, encoding: &'static Encoding, width: usize) -> Vec<u8> {
    let mut end = text.len();
    loop {
        let (bytes, _, _) = encoding.encode(&text[..end]);
        if bytes.len() <= width {
            return bytes.into_owned();
        }
        end = text[..end]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    use crate::errors::ErrorKind;

    fn encode(field: &DbaseFieldDescriptor, value: FieldValue) -> Result<String> {
        let mut out = Vec::new();
        encode_field(field, &value, WINDOWS_1252, &mut out)?;
        assert_eq!(out.len(), field.length as usize);
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn test_encode_numeric() {
        let field = DbaseFieldDescriptor::new("AREA", DbaseFieldType::Numeric, 8, 2);
        assert_eq!(encode(&field, 3.14159.into()).unwrap(), "    3.14");
        assert_eq!(encode(&field, 12.into()).unwrap(), "   12.00");
        assert_eq!(encode(&field, 123456.0.into()).unwrap(), "********");
        assert_eq!(encode(&field, FieldValue::Null).unwrap(), "        ");
        assert_eq!(encode(&field, "n/a".into()).unwrap(), "     n/a");
        assert!(encode(&field, true.into()).is_err());

        let float = DbaseFieldDescriptor::new("RATIO", DbaseFieldType::Float, 6, 0);
        assert_eq!(encode(&float, (-2.4).into()).unwrap(), "    -2");
    }

    #[test]
    fn test_encode_character() {
        let field = DbaseFieldDescriptor::new("NAME", DbaseFieldType::Character, 6, 0);
        assert_eq!(encode(&field, "abc".into()).unwrap(), "abc   ");
        assert_eq!(encode(&field, "abcdefgh".into()).unwrap(), "abcdef");
        assert_eq!(encode(&field, 42.into()).unwrap(), "42    ");
        assert_eq!(encode(&field, FieldValue::Null).unwrap(), "      ");

        let mut out = Vec::new();
        encode_field(&field, &"Café".into(), WINDOWS_1252, &mut out).unwrap();
        assert_eq!(out, b"Caf\xe9  ");

        // multi-byte characters are never split
        let mut out = Vec::new();
        encode_field(&field, &"ééé".into(), UTF_8, &mut out).unwrap();
        assert_eq!(out, "ééé".as_bytes());
        let mut out = Vec::new();
        encode_field(&field, &"aéééé".into(), UTF_8, &mut out).unwrap();
        assert_eq!(out, "aéé ".as_bytes());
    }

    #[test]
    fn test_encode_logical_and_date() {
        let flag = DbaseFieldDescriptor::new("FLAG", DbaseFieldType::Logical, 1, 0);
        assert_eq!(encode(&flag, true.into()).unwrap(), "T");
        assert_eq!(encode(&flag, false.into()).unwrap(), "F");
        assert_eq!(encode(&flag, FieldValue::Null).unwrap(), "?");
        assert!(encode(&flag, 1.into()).is_err());

        let day = DbaseFieldDescriptor::new("DAY", DbaseFieldType::Date, 8, 0);
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(encode(&day, date.into()).unwrap(), "19991231");
        assert_eq!(encode(&day, FieldValue::Null).unwrap(), "        ");
        assert!(encode(&day, "19991231".into()).is_err());
    }

    #[test]
    fn test_encode_date_outside_four_digit_years() {
        let day = DbaseFieldDescriptor::new("DAY", DbaseFieldType::Date, 8, 0);
        for date in [
            NaiveDate::from_ymd_opt(10000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(-1, 12, 31).unwrap(),
        ] {
            let mut out = Vec::new();
            let err = encode_field(&day, &date.into(), WINDOWS_1252, &mut out).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange);
        }
        let first = NaiveDate::from_ymd_opt(0, 1, 1).unwrap();
        assert_eq!(encode(&day, first.into()).unwrap(), "00000101");
        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(encode(&day, last.into()).unwrap(), "99991231");
    }
}
