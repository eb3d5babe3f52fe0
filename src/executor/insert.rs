use crate::{
    executor::{
        result::StatementResult,
        statement::{InsertStatement, Literal},
    },
    storage::{
        bplus_tree::BPlusTree,
        catalog::{Catalog, ColumnSchema},
        pager::Pager,
    },
    types::{
        error::{DatabaseError, Result},
        row::Row,
        value::{DataType, Value},
        Key,
    },
};

pub struct InsertExecutor;

impl InsertExecutor {
    pub fn execute(
        pager: &mut Pager,
        catalog: &mut Catalog,
        statement: InsertStatement,
    ) -> Result<StatementResult> {
        let table = catalog
            .table(&statement.table)
            .cloned()
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: statement.table.clone(),
            })?;

        if statement.columns.len() != statement.values.len() {
            return Err(DatabaseError::ArityMismatch {
                columns: statement.columns.len(),
                values: statement.values.len(),
            });
        }

        // Build the full row, NULL everywhere a column wasn't named.
        let mut row = Row::nulls(table.columns.len());
        for (column_name, literal) in statement.columns.iter().zip(&statement.values) {
            let index =
                table
                    .column_index(column_name)
                    .ok_or_else(|| DatabaseError::ColumnNotFound {
                        name: column_name.clone(),
                        table: table.name.clone(),
                    })?;
            row.values[index] = convert_literal(&table.columns[index], literal)?;
        }

        for (index, column) in table.columns.iter().enumerate() {
            if column.not_null && row.values[index].is_null() {
                return Err(DatabaseError::NotNullViolation {
                    column: column.name.clone(),
                });
            }
        }

        let mut tree = BPlusTree::open(table.root_page);

        let (key, keyed_by_primary) = match table.primary_key_column() {
            Some((index, column)) => (primary_key_value(column, &row.values[index])?, true),
            None => (synthesize_key(&tree, pager)?, false),
        };

        match tree.insert(pager, key, row) {
            Ok(()) => {}
            Err(DatabaseError::DuplicateKey { key }) if keyed_by_primary => {
                return Err(DatabaseError::DuplicatePrimaryKey {
                    table: table.name.clone(),
                    key,
                });
            }
            Err(e) => return Err(e),
        }

        // A root split moved the tree; the catalog must mirror the new
        // root before this operation returns.
        if tree.root_page() != table.root_page {
            catalog.set_root_page(&table.name, tree.root_page())?;
            catalog.save(pager)?;
        }

        Ok(StatementResult::Inserted {
            message: "1 row inserted".to_string(),
        })
    }
}

/// Convert a parsed literal to the column's storage type. INTEGER
/// columns take integer literals or strings holding a whole decimal
/// integer; TEXT columns take any literal's string form.
fn convert_literal(column: &ColumnSchema, literal: &Literal) -> Result<Value> {
    let conversion_error = || DatabaseError::ConversionError {
        column: column.name.clone(),
        value: literal.to_string(),
        target: column.data_type.to_string(),
    };

    match (column.data_type, literal) {
        (_, Literal::Null) => Ok(Value::Null),
        (DataType::Integer, _) => {
            let i = literal
                .coerce_to_integer()
                .and_then(|i| i32::try_from(i).ok())
                .ok_or_else(conversion_error)?;
            Ok(Value::Integer(i))
        }
        (DataType::Text, Literal::Integer(i)) => Ok(Value::Text(i.to_string())),
        (DataType::Text, Literal::Text(s)) => {
            if s.len() > u16::MAX as usize {
                return Err(conversion_error());
            }
            Ok(Value::Text(s.clone()))
        }
    }
}

/// The tree key for a table with a PRIMARY KEY column: its converted
/// value, which must be a non-negative integer.
fn primary_key_value(column: &ColumnSchema, value: &Value) -> Result<Key> {
    match value {
        Value::Integer(i) if *i >= 0 => Ok(*i as Key),
        other => Err(DatabaseError::InvalidPrimaryKey {
            column: column.name.clone(),
            value: other.to_string(),
        }),
    }
}

/// Without a PRIMARY KEY the key is max(existing) + 1, or 1 for an
/// empty tree. Found by scanning; the leaf chain yields ascending keys
/// so the last one wins.
fn synthesize_key(tree: &BPlusTree, pager: &mut Pager) -> Result<Key> {
    let mut max_key = 0;
    for item in tree.scan(pager) {
        let (key, _) = item?;
        max_key = key;
    }
    Ok(max_key + 1)
}
