use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::byte_order::ReadBytesExt;
use crate::errors::Result;
use crate::shapefile::ShapefileHeader;

/// One `.shx` entry. Both values count 16-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Offset of the record header in the `.shp` file.
    pub offset: i32,
    /// Length of the record content, record header excluded.
    pub content_length: i32,
}

/// Iterates the (offset, length) pairs of an `.shx` file.
#[derive(Debug)]
pub struct ShapefileIndexReader<R: Read> {
    reader: R,
    header: ShapefileHeader,
    remaining: i32,
}

impl ShapefileIndexReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(BufReader::new(File::open(path.as_ref())?))
    }
}

impl<R: Read> ShapefileIndexReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let header = ShapefileHeader::read(&mut reader)?;
        let remaining = header.index_record_count().max(0);
        Ok(ShapefileIndexReader {
            reader,
            header,
            remaining,
        })
    }

    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    fn read_entry(&mut self) -> Result<IndexEntry> {
        Ok(IndexEntry {
            offset: self.reader.read_i32_be()?,
            content_length: self.reader.read_i32_be()?,
        })
    }

    /// Number of entries not read yet.
    pub fn remaining(&self) -> usize {
        self.remaining as usize
    }
}

impl<R: Read> Iterator for ShapefileIndexReader<R> {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let entry = self.read_entry();
        if entry.is_err() {
            self.remaining = 0;
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}
