use std::io::{Read, Seek, SeekFrom, Write};

use sqlt::{
    storage::pager::Pager,
    types::{error::DatabaseError, DEFAULT_PAGE_SIZE},
    utils::mock::create_temp_db_path_with_prefix,
};

struct TempPath(std::path::PathBuf);

impl TempPath {
    fn new(prefix: &str) -> Self {
        Self(create_temp_db_path_with_prefix(prefix))
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn test_create_initializes_header_and_catalog() {
    let path = TempPath::new("pager_create");
    let pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();

    let header = pager.header();
    assert_eq!(header.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(header.total_pages, 2);
    assert_eq!(header.catalog_page, 1);

    pager.close().unwrap();

    let file_size = std::fs::metadata(&path.0).unwrap().len();
    assert_eq!(file_size, 2 * DEFAULT_PAGE_SIZE as u64);

    // page 0 starts with the magic word, page 1 with the catalog tag
    let mut file = std::fs::File::open(&path.0).unwrap();
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).unwrap();
    assert_eq!(u32::from_le_bytes(magic), 0x53514C54);

    file.seek(SeekFrom::Start(DEFAULT_PAGE_SIZE as u64)).unwrap();
    let mut catalog_head = [0u8; 3];
    file.read_exact(&mut catalog_head).unwrap();
    assert_eq!(catalog_head, [0x01, 0x00, 0x00]);
}

#[test]
fn test_allocate_page_extends_file_and_header() {
    let path = TempPath::new("pager_allocate");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();

    let page = pager.allocate_page().unwrap();
    assert_eq!(page, 2);
    assert_eq!(pager.total_pages(), 3);

    let page = pager.allocate_page().unwrap();
    assert_eq!(page, 3);

    pager.close().unwrap();
    let file_size = std::fs::metadata(&path.0).unwrap().len();
    assert_eq!(file_size, 4 * DEFAULT_PAGE_SIZE as u64);
}

#[test]
fn test_allocated_page_is_zeroed() {
    let path = TempPath::new("pager_zeroed");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    let page = pager.allocate_page().unwrap();
    let bytes = pager.read_page(page).unwrap();
    assert!(bytes.iter().all(|&b| b == 0));
}

#[test]
fn test_write_then_read_round_trip() {
    let path = TempPath::new("pager_round_trip");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    let page = pager.allocate_page().unwrap();

    let mut buffer = vec![0u8; DEFAULT_PAGE_SIZE as usize];
    buffer[0] = 0xAA;
    buffer[DEFAULT_PAGE_SIZE as usize - 1] = 0xBB;
    pager.write_page(page, &buffer).unwrap();

    assert_eq!(pager.read_page(page).unwrap(), buffer);
}

#[test]
fn test_read_out_of_range() {
    let path = TempPath::new("pager_read_range");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    match pager.read_page(2) {
        Err(DatabaseError::PageOutOfRange { page, total }) => {
            assert_eq!(page, 2);
            assert_eq!(total, 2);
        }
        other => panic!("Expected PageOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_write_out_of_range() {
    let path = TempPath::new("pager_write_range");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    let buffer = vec![0u8; DEFAULT_PAGE_SIZE as usize];
    assert!(matches!(
        pager.write_page(5, &buffer),
        Err(DatabaseError::PageOutOfRange { .. })
    ));
}

#[test]
fn test_write_wrong_buffer_size() {
    let path = TempPath::new("pager_size_mismatch");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    match pager.write_page(1, &[0u8; 100]) {
        Err(DatabaseError::PageSizeMismatch { expected, actual }) => {
            assert_eq!(expected, DEFAULT_PAGE_SIZE as usize);
            assert_eq!(actual, 100);
        }
        other => panic!("Expected PageSizeMismatch, got {:?}", other),
    }
}

#[test]
fn test_reopen_preserves_header() {
    let path = TempPath::new("pager_reopen");
    let mut pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    pager.allocate_page().unwrap();
    pager.close().unwrap();

    let pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    assert_eq!(pager.total_pages(), 3);
    assert_eq!(pager.page_size(), DEFAULT_PAGE_SIZE);
}

#[test]
fn test_custom_page_size() {
    let path = TempPath::new("pager_page_size");
    let pager = Pager::open(&path.0, 512).unwrap();
    assert_eq!(pager.page_size(), 512);
    pager.close().unwrap();

    // the recorded page size wins on reopen, whatever the caller asks
    let pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    assert_eq!(pager.page_size(), 512);
    assert_eq!(
        std::fs::metadata(&path.0).unwrap().len(),
        2 * 512u64
    );
}

#[test]
fn test_bad_magic_rejected() {
    let path = TempPath::new("pager_bad_magic");
    let pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    pager.close().unwrap();

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .open(&path.0)
        .unwrap();
    file.write_all(b"JUNK").unwrap();
    file.flush().unwrap();
    drop(file);

    assert!(matches!(
        Pager::open(&path.0, DEFAULT_PAGE_SIZE),
        Err(DatabaseError::InvalidMagic { .. })
    ));
}

#[test]
fn test_truncated_file_rejected() {
    let path = TempPath::new("pager_truncated");
    let pager = Pager::open(&path.0, DEFAULT_PAGE_SIZE).unwrap();
    pager.close().unwrap();

    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(&path.0)
        .unwrap();
    file.set_len(DEFAULT_PAGE_SIZE as u64 + 100).unwrap();
    drop(file);

    assert!(matches!(
        Pager::open(&path.0, DEFAULT_PAGE_SIZE),
        Err(DatabaseError::CorruptedDatabase { .. })
    ));
}
