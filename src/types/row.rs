use serde::{Deserialize, Serialize};

use crate::types::{
    error::{DatabaseError, Result},
    value::Value,
};

/// An ordered tuple of tagged values, one per table column. Serialized
/// as the leaf-cell payload that follows the key: a u16 value count and
/// then each value in its tagged form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// A row of `len` NULLs, the starting point for INSERT row building.
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![Value::Null; len],
        }
    }

    pub fn get_value(&self, column_index: usize) -> Option<&Value> {
        self.values.get(column_index)
    }

    pub fn serialized_size(&self) -> usize {
        2 + self
            .values
            .iter()
            .map(|v| v.serialized_size())
            .sum::<usize>()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.values.len() > u16::MAX as usize {
            return Err(DatabaseError::SerializationError {
                details: format!("Row of {} values exceeds u16 count", self.values.len()),
            });
        }

        let mut buffer = Vec::with_capacity(self.serialized_size());
        buffer.extend_from_slice(&(self.values.len() as u16).to_le_bytes());
        for value in &self.values {
            buffer.extend_from_slice(&value.to_bytes()?);
        }
        Ok(buffer)
    }

    /// Decode a row from the front of `bytes`, returning it together
    /// with the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Row, usize)> {
        if bytes.len() < 2 {
            return Err(DatabaseError::SerializationError {
                details: "Incomplete row value count".to_string(),
            });
        }

        let value_count = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
        let mut cursor = 2;

        let mut values = Vec::with_capacity(value_count);
        for _ in 0..value_count {
            let (value, consumed) = Value::from_bytes(&bytes[cursor..])?;
            values.push(value);
            cursor += consumed;
        }

        Ok((Row { values }, cursor))
    }
}
