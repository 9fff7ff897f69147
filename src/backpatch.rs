//! Files whose header is only known once every record has been written.
//!
//! The DBF, `.shp` and `.shx` writers all put a provisional header at offset 0,
//! stream records after it while keeping running totals in the header value,
//! and rewrite the header in place when they are closed. [`BackpatchedFile`]
//! owns that sequence. Dropping it without calling [`BackpatchedFile::close`]
//! still rewrites the header; a failure at that point can only be logged.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// A header that can be serialized at the start of a file.
pub trait FileHeader {
    /// Write the header at the current position of `w`.
    fn write_header<W: Write>(&self, w: &mut W) -> Result<()>;
}

pub struct BackpatchedFile<H: FileHeader> {
    path: PathBuf,
    file: BufWriter<File>,
    header: H,
    finished: bool,
}

impl<H: FileHeader> BackpatchedFile<H> {
    /// Create (or truncate) `path`. Nothing is written until
    /// [`write_provisional_header`](Self::write_provisional_header) or a record write.
    pub fn create<P: AsRef<Path>>(path: P, header: H) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(BackpatchedFile {
            path,
            file: BufWriter::new(file),
            header,
            finished: false,
        })
    }

    /// Open an existing file whose header has already been parsed into `header`,
    /// positioned at its end.
    pub fn append<P: AsRef<Path>>(path: P, header: H) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;
        file.seek(SeekFrom::End(0))?;
        Ok(BackpatchedFile {
            path,
            file: BufWriter::new(file),
            header,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &H {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut H {
        &mut self.header
    }

    /// Write the current header at offset 0 and return to the end of the file.
    pub fn write_provisional_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.header.write_header(&mut self.file)?;
        self.file.seek(SeekFrom::End(0))?;
        Ok(())
    }

    /// Rewrite the header with its final values and flush everything to disk.
    pub fn finish(&mut self) -> Result<()> {
        self.write_provisional_header()?;
        self.file.flush()?;
        self.finished = true;
        tracing::debug!(path = %self.path.display(), "header backpatched");
        Ok(())
    }

    /// [`finish`](Self::finish) and release the handle.
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }
}

impl<H: FileHeader> Write for BackpatchedFile<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.finished = false;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl<H: FileHeader> Drop for BackpatchedFile<H> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.finish() {
            tracing::error!(path = %self.path.display(), error = %e, "failed to finalize header");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::WriteBytesExt;
    use crate::test_utils::TempFixture;

    struct CountHeader {
        records: u32,
    }

    impl FileHeader for CountHeader {
        fn write_header<W: Write>(&self, w: &mut W) -> Result<()> {
            w.write_u32_le(self.records)?;
            Ok(())
        }
    }

    fn append_record(file: &mut BackpatchedFile<CountHeader>, value: u8) {
        file.write_all(&[value]).unwrap();
        file.header_mut().records += 1;
    }

    #[test]
    fn test_close_backpatches_header() {
        let fixture = TempFixture::empty("counted.bin");
        let mut file = BackpatchedFile::create(fixture.path(), CountHeader { records: 0 }).unwrap();
        file.write_provisional_header().unwrap();
        append_record(&mut file, 7);
        append_record(&mut file, 8);
        file.close().unwrap();

        let bytes = std::fs::read(fixture.path()).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, 7, 8]);
    }

    #[test]
    fn test_drop_backpatches_header() {
        let fixture = TempFixture::empty("dropped.bin");
        {
            let mut file =
                BackpatchedFile::create(fixture.path(), CountHeader { records: 0 }).unwrap();
            file.write_provisional_header().unwrap();
            append_record(&mut file, 1);
        }
        let bytes = std::fs::read(fixture.path()).unwrap();
        assert_eq!(bytes, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_append_continues_at_end() {
        let fixture = TempFixture::empty("appended.bin");
        std::fs::write(fixture.path(), [1, 0, 0, 0, 5]).unwrap();
        let mut file = BackpatchedFile::append(fixture.path(), CountHeader { records: 1 }).unwrap();
        append_record(&mut file, 6);
        file.close().unwrap();
        let bytes = std::fs::read(fixture.path()).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, 5, 6]);
    }
}
