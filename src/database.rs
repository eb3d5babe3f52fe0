use std::path::Path;

use crate::{
    executor::{
        create_table::CreateTableExecutor, insert::InsertExecutor, result::StatementResult,
        select::SelectExecutor, statement::Statement,
    },
    storage::{catalog::Catalog, header::FileHeader, pager::Pager},
    types::{error::Result, DEFAULT_PAGE_SIZE},
};

/// One open database: the pager that owns the file plus the in-memory
/// catalog mirror. Statements parsed by the external front-end come in
/// through `execute`.
pub struct Database {
    pager: Pager,
    catalog: Catalog,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_page_size(path, DEFAULT_PAGE_SIZE)
    }

    /// `page_size` applies only when the file is created; an existing
    /// file keeps the page size recorded in its header.
    pub fn open_with_page_size<P: AsRef<Path>>(path: P, page_size: u16) -> Result<Self> {
        let mut pager = Pager::open(path, page_size)?;
        let catalog = Catalog::load(&mut pager)?;
        Ok(Self { pager, catalog })
    }

    pub fn execute(&mut self, statement: Statement) -> Result<StatementResult> {
        match statement {
            Statement::CreateTable(statement) => {
                CreateTableExecutor::execute(&mut self.pager, &mut self.catalog, statement)
            }
            Statement::Insert(statement) => {
                InsertExecutor::execute(&mut self.pager, &mut self.catalog, statement)
            }
            Statement::Select(statement) => {
                SelectExecutor::execute(&mut self.pager, &self.catalog, statement)
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Snapshot of the file header (page size, page count, catalog page).
    pub fn header(&self) -> FileHeader {
        self.pager.header()
    }

    /// Flush the header and release the file.
    pub fn close(self) -> Result<()> {
        self.pager.close()
    }
}
