use serde::{Deserialize, Serialize};

use crate::types::row::Row;

/// The success half of the executor surface. Failures travel as
/// `DatabaseError`; the REPL collaborator renders either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementResult {
    Created {
        message: String,
    },
    Inserted {
        message: String,
    },
    Selected {
        columns: Vec<String>,
        rows: Vec<Row>,
        message: String,
    },
}

impl StatementResult {
    pub fn message(&self) -> &str {
        match self {
            StatementResult::Created { message } => message,
            StatementResult::Inserted { message } => message,
            StatementResult::Selected { message, .. } => message,
        }
    }
}
