pub mod create_table;
pub mod insert;
pub mod predicate;
pub mod result;
pub mod select;
pub mod statement;
