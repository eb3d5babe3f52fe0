use serde::{Deserialize, Serialize};

use crate::types::error::{DatabaseError, Result};

pub const NULL_TAG: u8 = 0x00;
pub const INTEGER_TAG: u8 = 0x01;
pub const TEXT_TAG: u8 = 0x02;

/// Column data types. NULL is a value, not a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            INTEGER_TAG => Ok(DataType::Integer),
            TEXT_TAG => Ok(DataType::Text),
            _ => Err(DatabaseError::SerializationError {
                details: format!("Unknown column type tag: 0x{:02X}", tag),
            }),
        }
    }

    pub fn as_tag(&self) -> u8 {
        match self {
            DataType::Integer => INTEGER_TAG,
            DataType::Text => TEXT_TAG,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}

/// A stored value: one byte of type tag followed by a type-specific
/// payload (nothing / 4-byte signed little-endian / u16 length + UTF-8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i32),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn serialized_size(&self) -> usize {
        match self {
            Value::Null => 1,
            Value::Integer(_) => 1 + 4,
            Value::Text(s) => 1 + 2 + s.len(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.serialized_size());
        match self {
            Value::Null => {
                buffer.push(NULL_TAG);
            }
            Value::Integer(i) => {
                buffer.push(INTEGER_TAG);
                buffer.extend_from_slice(&i.to_le_bytes());
            }
            Value::Text(s) => {
                if s.len() > u16::MAX as usize {
                    return Err(DatabaseError::SerializationError {
                        details: format!("Text value of {} bytes exceeds u16 length", s.len()),
                    });
                }
                buffer.push(TEXT_TAG);
                buffer.extend_from_slice(&(s.len() as u16).to_le_bytes());
                buffer.extend_from_slice(s.as_bytes());
            }
        }
        Ok(buffer)
    }

    /// Decode one tagged value from the front of `bytes`, returning it
    /// together with the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Value, usize)> {
        if bytes.is_empty() {
            return Err(DatabaseError::SerializationError {
                details: "Empty value bytes".to_string(),
            });
        }

        match bytes[0] {
            NULL_TAG => Ok((Value::Null, 1)),
            INTEGER_TAG => {
                if bytes.len() < 5 {
                    return Err(DatabaseError::SerializationError {
                        details: "Incomplete integer value".to_string(),
                    });
                }
                let i = i32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
                Ok((Value::Integer(i), 5))
            }
            TEXT_TAG => {
                if bytes.len() < 3 {
                    return Err(DatabaseError::SerializationError {
                        details: "Incomplete text length".to_string(),
                    });
                }
                let length = u16::from_le_bytes([bytes[1], bytes[2]]) as usize;
                if bytes.len() < 3 + length {
                    return Err(DatabaseError::SerializationError {
                        details: format!(
                            "Text value truncated: expected {} bytes, got {}",
                            length,
                            bytes.len() - 3
                        ),
                    });
                }
                let text = std::str::from_utf8(&bytes[3..3 + length])
                    .map_err(|e| DatabaseError::SerializationError {
                        details: format!("Invalid UTF-8 in text value: {}", e),
                    })?
                    .to_string();
                Ok((Value::Text(text), 3 + length))
            }
            tag => Err(DatabaseError::SerializationError {
                details: format!("Unknown value tag: 0x{:02X}", tag),
            }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}
