use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use crate::{
    storage::{header::FileHeader, CATALOG_PAGE, FILE_HEADER_SIZE},
    types::{
        error::{DatabaseError, Result},
        CATALOG_PAGE_TAG, MIN_PAGE_SIZE, PageId,
    },
};

/// Exclusive owner of the database file. All page I/O goes through the
/// pager; the B+Tree and executor borrow it per operation and never
/// retain page buffers across operations.
pub struct Pager {
    file: File,
    path: PathBuf,
    header: FileHeader,
}

impl Pager {
    /// Open a database file, creating and initializing it if missing.
    ///
    /// A fresh file gets page 0 (header, `total_pages = 2`) and page 1
    /// (empty catalog). For an existing file the header is validated
    /// and its recorded page size wins over `page_size`.
    pub fn open<P: AsRef<Path>>(path: P, page_size: u16) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            Self::open_existing(path)
        } else {
            Self::create_new(path, page_size)
        }
    }

    fn create_new(path: &Path, page_size: u16) -> Result<Self> {
        if page_size < MIN_PAGE_SIZE {
            return Err(DatabaseError::CorruptedDatabase {
                reason: format!("Unsupported page size: {}", page_size),
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let header = FileHeader::new(page_size, 2, CATALOG_PAGE);

        let mut header_page = vec![0u8; page_size as usize];
        header_page[..FILE_HEADER_SIZE].copy_from_slice(&header.to_bytes());

        let mut catalog_page = vec![0u8; page_size as usize];
        catalog_page[0] = CATALOG_PAGE_TAG;
        // table count stays zero

        file.write_all(&header_page)?;
        file.write_all(&catalog_page)?;
        file.flush()?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            header,
        })
    }

    fn open_existing(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let mut header_buffer = [0u8; FILE_HEADER_SIZE];
        file.read_exact(&mut header_buffer)?;
        let header = FileHeader::from_bytes(&header_buffer)?;

        let file_size = file.metadata()?.len();
        let expected = header.total_pages as u64 * header.page_size as u64;
        if file_size != expected {
            return Err(DatabaseError::CorruptedDatabase {
                reason: format!(
                    "File size {} doesn't match header ({} pages of {} bytes)",
                    file_size, header.total_pages, header.page_size
                ),
            });
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_size(&self) -> u16 {
        self.header.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.header.total_pages
    }

    /// Snapshot of the current file header.
    pub fn header(&self) -> FileHeader {
        self.header
    }

    /// Allocate a fresh zero-initialized page at the end of the file
    /// and persist the updated header.
    pub fn allocate_page(&mut self) -> Result<PageId> {
        let page = self.header.total_pages;
        let zeroed = vec![0u8; self.header.page_size as usize];

        self.seek_to(page)?;
        self.file.write_all(&zeroed)?;

        self.header.total_pages += 1;
        self.flush_header()?;

        Ok(page)
    }

    pub fn read_page(&mut self, page: PageId) -> Result<Vec<u8>> {
        self.check_range(page)?;

        let mut buffer = vec![0u8; self.header.page_size as usize];
        self.seek_to(page)?;
        self.file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    pub fn write_page(&mut self, page: PageId, buffer: &[u8]) -> Result<()> {
        self.check_range(page)?;
        if buffer.len() != self.header.page_size as usize {
            return Err(DatabaseError::PageSizeMismatch {
                expected: self.header.page_size as usize,
                actual: buffer.len(),
            });
        }

        self.seek_to(page)?;
        self.file.write_all(buffer)?;
        Ok(())
    }

    /// Flush the header and release the file.
    pub fn close(mut self) -> Result<()> {
        self.flush_header()?;
        self.file.flush()?;
        Ok(())
    }

    fn check_range(&self, page: PageId) -> Result<()> {
        if page >= self.header.total_pages {
            return Err(DatabaseError::PageOutOfRange {
                page,
                total: self.header.total_pages,
            });
        }
        Ok(())
    }

    fn seek_to(&mut self, page: PageId) -> Result<()> {
        let offset = page as u64 * self.header.page_size as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn flush_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.header.to_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}
