use std::cmp::Ordering;

use crate::{
    executor::statement::{ComparisonOp, Condition, Literal},
    storage::catalog::TableSchema,
    types::{
        error::{DatabaseError, Result},
        row::Row,
        value::Value,
    },
};

/// Evaluate a WHERE conjunction against one record. The record must
/// already be padded to the table's column count.
pub fn evaluate(conditions: &[Condition], row: &Row, table: &TableSchema) -> Result<bool> {
    for condition in conditions {
        let index =
            table
                .column_index(&condition.column)
                .ok_or_else(|| DatabaseError::ColumnNotFound {
                    name: condition.column.clone(),
                    table: table.name.clone(),
                })?;
        let left = row.get_value(index).unwrap_or(&Value::Null);
        if !matches(left, condition.op, &condition.value) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches(left: &Value, op: ComparisonOp, literal: &Literal) -> bool {
    match compare(left, literal) {
        None => false,
        Some(ordering) => match op {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
        },
    }
}

/// Ordering of a stored value against a literal, or None when the two
/// cannot be compared. A NULL on either side compares as nothing, so
/// no operator matches it. Integers compare numerically, accepting a
/// text literal that parses as a whole decimal integer; text compares
/// lexicographically against the literal's string form.
fn compare(left: &Value, literal: &Literal) -> Option<Ordering> {
    match left {
        Value::Null => None,
        Value::Integer(i) => {
            let rhs = literal.coerce_to_integer()?;
            Some((*i as i64).cmp(&rhs))
        }
        Value::Text(t) => {
            let rhs = match literal {
                Literal::Text(s) => s.clone(),
                Literal::Integer(n) => n.to_string(),
                Literal::Null => return None,
            };
            Some(t.as_str().cmp(rhs.as_str()))
        }
    }
}
