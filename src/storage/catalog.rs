use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    storage::pager::Pager,
    types::{
        error::{DatabaseError, Result},
        value::DataType,
        CATALOG_PAGE_TAG, PageId,
    },
};

const PRIMARY_KEY_FLAG: u8 = 0b0000_0001;
const NOT_NULL_FLAG: u8 = 0b0000_0010;
const UNIQUE_FLAG: u8 = 0b0000_0100;

/// A column definition stored in the catalog. The name keeps its
/// original casing for display; lookups normalize to lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: DataType,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            not_null: false,
            unique: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.primary_key {
            flags |= PRIMARY_KEY_FLAG;
        }
        if self.not_null {
            flags |= NOT_NULL_FLAG;
        }
        if self.unique {
            flags |= UNIQUE_FLAG;
        }
        flags
    }

    fn from_flags(name: String, data_type: DataType, flags: u8) -> Self {
        Self {
            name,
            data_type,
            primary_key: flags & PRIMARY_KEY_FLAG != 0,
            not_null: flags & NOT_NULL_FLAG != 0,
            unique: flags & UNIQUE_FLAG != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    pub root_page: PageId,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>, root_page: PageId) -> Self {
        Self {
            name: name.into(),
            columns,
            root_page,
        }
    }

    /// Case-insensitive column lookup returning the positional index.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let normalized = name.to_lowercase();
        self.columns
            .iter()
            .position(|col| col.name.to_lowercase() == normalized)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|col| col.name.clone()).collect()
    }

    /// The PRIMARY KEY column, if the table declares one.
    pub fn primary_key_column(&self) -> Option<(usize, &ColumnSchema)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, col)| col.primary_key)
    }
}

/// The single catalog page, kept in memory as an ordered table list
/// with a lowercase-keyed index. Every mutation rewrites the page in
/// full.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            tables: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Read the catalog page named by the file header and decode it.
    pub fn load(pager: &mut Pager) -> Result<Self> {
        let page = pager.header().catalog_page;
        let bytes = pager.read_page(page)?;
        Self::from_bytes(page, &bytes)
    }

    /// Re-encode every entry and rewrite the catalog page.
    pub fn save(&self, pager: &mut Pager) -> Result<()> {
        let page = pager.header().catalog_page;
        let bytes = self.to_bytes(pager.page_size() as usize)?;
        pager.write_page(page, &bytes)
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Case-insensitive table lookup.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.tables[i])
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Register a new table. The caller is responsible for the
    /// duplicate-name check and the subsequent `save`.
    pub fn add_table(&mut self, schema: TableSchema) {
        let normalized = schema.name.to_lowercase();
        self.index.insert(normalized, self.tables.len());
        self.tables.push(schema);
    }

    /// Point an existing table at a new tree root (after a root split).
    pub fn set_root_page(&mut self, name: &str, root_page: PageId) -> Result<()> {
        let index = self
            .index
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: name.to_string(),
            })?;
        self.tables[index].root_page = root_page;
        Ok(())
    }

    pub fn to_bytes(&self, page_size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; page_size];
        buffer[0] = CATALOG_PAGE_TAG;

        if self.tables.len() > u16::MAX as usize {
            return Err(DatabaseError::SerializationError {
                details: format!("{} tables exceed u16 count", self.tables.len()),
            });
        }
        buffer[1..3].copy_from_slice(&(self.tables.len() as u16).to_le_bytes());

        let mut offset = 3;
        for table in &self.tables {
            let entry = encode_table(table)?;
            if offset + entry.len() > page_size {
                return Err(DatabaseError::SerializationError {
                    details: format!("Catalog overflows {} byte page", page_size),
                });
            }
            buffer[offset..offset + entry.len()].copy_from_slice(&entry);
            offset += entry.len();
        }

        Ok(buffer)
    }

    pub fn from_bytes(page: PageId, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 3 {
            return Err(DatabaseError::CorruptedPage {
                page,
                reason: "Catalog page shorter than its header".to_string(),
            });
        }
        if bytes[0] != CATALOG_PAGE_TAG {
            return Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("Expected catalog tag 0x01, found 0x{:02X}", bytes[0]),
            });
        }

        let table_count = u16::from_le_bytes([bytes[1], bytes[2]]) as usize;
        let mut catalog = Self::empty();
        let mut offset = 3;
        for _ in 0..table_count {
            let (table, consumed) = decode_table(page, &bytes[offset..])?;
            offset += consumed;
            catalog.add_table(table);
        }

        Ok(catalog)
    }
}

fn encode_table(table: &TableSchema) -> Result<Vec<u8>> {
    let mut entry = Vec::new();

    let name = table.name.as_bytes();
    if name.len() > u16::MAX as usize {
        return Err(DatabaseError::SerializationError {
            details: format!("Table name of {} bytes exceeds u16 length", name.len()),
        });
    }
    entry.extend_from_slice(&(name.len() as u16).to_le_bytes());
    entry.extend_from_slice(name);

    if table.columns.len() > u16::MAX as usize {
        return Err(DatabaseError::SerializationError {
            details: format!("{} columns exceed u16 count", table.columns.len()),
        });
    }
    entry.extend_from_slice(&(table.columns.len() as u16).to_le_bytes());

    for column in &table.columns {
        let col_name = column.name.as_bytes();
        if col_name.len() > u16::MAX as usize {
            return Err(DatabaseError::SerializationError {
                details: format!("Column name of {} bytes exceeds u16 length", col_name.len()),
            });
        }
        entry.extend_from_slice(&(col_name.len() as u16).to_le_bytes());
        entry.extend_from_slice(col_name);
        entry.push(column.data_type.as_tag());
        entry.push(column.flags());
    }

    entry.extend_from_slice(&table.root_page.to_le_bytes());
    Ok(entry)
}

fn decode_table(page: PageId, bytes: &[u8]) -> Result<(TableSchema, usize)> {
    let corrupted = |reason: String| DatabaseError::CorruptedPage { page, reason };

    let mut offset = 0;
    let name = read_string(bytes, &mut offset)
        .ok_or_else(|| corrupted("Truncated table name".to_string()))?;

    if offset + 2 > bytes.len() {
        return Err(corrupted(format!("Truncated column count for '{}'", name)));
    }
    let column_count = u16::from_le_bytes([bytes[offset], bytes[offset + 1]]) as usize;
    offset += 2;

    let mut columns = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        let col_name = read_string(bytes, &mut offset)
            .ok_or_else(|| corrupted(format!("Truncated column name in '{}'", name)))?;
        if offset + 2 > bytes.len() {
            return Err(corrupted(format!("Truncated column tags in '{}'", name)));
        }
        let data_type = DataType::from_tag(bytes[offset])?;
        let flags = bytes[offset + 1];
        offset += 2;
        columns.push(ColumnSchema::from_flags(col_name, data_type, flags));
    }

    if offset + 4 > bytes.len() {
        return Err(corrupted(format!("Truncated root page for '{}'", name)));
    }
    let root_page = u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]);
    offset += 4;

    Ok((TableSchema::new(name, columns, root_page), offset))
}

fn read_string(bytes: &[u8], offset: &mut usize) -> Option<String> {
    if *offset + 2 > bytes.len() {
        return None;
    }
    let length = u16::from_le_bytes([bytes[*offset], bytes[*offset + 1]]) as usize;
    *offset += 2;
    if *offset + length > bytes.len() {
        return None;
    }
    let text = std::str::from_utf8(&bytes[*offset..*offset + length])
        .ok()?
        .to_string();
    *offset += length;
    Some(text)
}
