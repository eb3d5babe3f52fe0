use std::collections::HashSet;

use crate::{
    executor::{result::StatementResult, statement::CreateTableStatement},
    storage::{
        bplus_tree::BPlusTree,
        catalog::{Catalog, ColumnSchema, TableSchema},
        pager::Pager,
    },
    types::error::{DatabaseError, Result},
};

pub struct CreateTableExecutor;

impl CreateTableExecutor {
    pub fn execute(
        pager: &mut Pager,
        catalog: &mut Catalog,
        statement: CreateTableStatement,
    ) -> Result<StatementResult> {
        if catalog.contains_table(&statement.table) {
            return Err(DatabaseError::TableAlreadyExists {
                name: statement.table,
            });
        }
        Self::validate_columns(&statement)?;

        let columns: Vec<ColumnSchema> = statement
            .columns
            .iter()
            .map(|def| ColumnSchema {
                name: def.name.clone(),
                data_type: def.data_type,
                primary_key: def.primary_key,
                not_null: def.not_null,
                unique: def.unique,
            })
            .collect();

        let tree = BPlusTree::create(pager)?;
        catalog.add_table(TableSchema::new(
            statement.table.clone(),
            columns,
            tree.root_page(),
        ));
        catalog.save(pager)?;

        Ok(StatementResult::Created {
            message: format!("Table '{}' created", statement.table),
        })
    }

    fn validate_columns(statement: &CreateTableStatement) -> Result<()> {
        if statement.columns.is_empty() {
            return Err(DatabaseError::Unsupported {
                details: format!("CREATE TABLE '{}' without columns", statement.table),
            });
        }

        let mut seen = HashSet::new();
        for column in &statement.columns {
            if !seen.insert(column.name.to_lowercase()) {
                return Err(DatabaseError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }

        let primary_keys = statement.columns.iter().filter(|c| c.primary_key).count();
        if primary_keys > 1 {
            return Err(DatabaseError::MultiplePrimaryKeys {
                table: statement.table.clone(),
            });
        }

        Ok(())
    }
}
