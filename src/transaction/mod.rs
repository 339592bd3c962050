//! Transaction records and the queries that select them.
//!
//! This module contains:
//! - The `Transaction` model and its database table
//! - The query builder that turns request parameters into filters and pages
//! - The route handler for listing transactions

mod core;
mod list_endpoint;
mod query;

#[cfg(test)]
pub(crate) mod test_utils;

pub use core::{Transaction, count_transactions, create_transaction_table, insert_transactions};
pub use list_endpoint::list_transactions_endpoint;
pub use query::{MonthFilter, Pagination, TransactionFilter, get_transactions};

pub(crate) use query::WhereClause;
