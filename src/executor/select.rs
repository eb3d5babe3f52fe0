use crate::{
    executor::{
        predicate,
        result::StatementResult,
        statement::{Projection, SelectStatement},
    },
    storage::{bplus_tree::BPlusTree, catalog::Catalog, pager::Pager},
    types::{
        error::{DatabaseError, Result},
        row::Row,
        value::Value,
    },
};

pub struct SelectExecutor;

impl SelectExecutor {
    pub fn execute(
        pager: &mut Pager,
        catalog: &Catalog,
        statement: SelectStatement,
    ) -> Result<StatementResult> {
        let table = catalog
            .table(&statement.table)
            .cloned()
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: statement.table.clone(),
            })?;

        // Resolve the projection and WHERE columns before touching any
        // page, so unknown names reject the query outright.
        let projection: Vec<usize> = match &statement.projection {
            Projection::All => (0..table.columns.len()).collect(),
            Projection::Columns(names) => names
                .iter()
                .map(|name| {
                    table
                        .column_index(name)
                        .ok_or_else(|| DatabaseError::ColumnNotFound {
                            name: name.clone(),
                            table: table.name.clone(),
                        })
                })
                .collect::<Result<_>>()?,
        };
        for condition in &statement.conditions {
            if table.column_index(&condition.column).is_none() {
                return Err(DatabaseError::ColumnNotFound {
                    name: condition.column.clone(),
                    table: table.name.clone(),
                });
            }
        }

        let tree = BPlusTree::open(table.root_page);
        let mut rows = Vec::new();
        for item in tree.scan(pager) {
            let (_, stored) = item?;

            // Pad to the declared column count; missing trailing
            // values read as NULL.
            let mut record = stored;
            while record.values.len() < table.columns.len() {
                record.values.push(Value::Null);
            }

            if !predicate::evaluate(&statement.conditions, &record, &table)? {
                continue;
            }

            rows.push(Row::new(
                projection.iter().map(|&i| record.values[i].clone()).collect(),
            ));
        }

        let columns: Vec<String> = projection
            .iter()
            .map(|&i| table.columns[i].name.clone())
            .collect();
        let message = format!("{} row(s)", rows.len());

        Ok(StatementResult::Selected {
            columns,
            rows,
            message,
        })
    }
}
