//! Builds the SQL filters and pagination windows used to select transactions.
//!
//! Request parameters arrive as optional strings and are never rejected:
//! missing values fall back to defaults and malformed values loosen the
//! query rather than produce an error.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    db::{PRICE_TEXT, UNICODE_LOWER},
};

use super::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row};

/// The page to show when the request does not specify one.
pub const DEFAULT_PAGE: i64 = 1;
/// The number of transactions per page when the request does not specify it.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Selects transactions by the month component of their sale date.
///
/// The month, e.g. "03", is matched as the substring "03-" anywhere in the
/// sale date string, so it matches every year. When no month is given the
/// pattern is just "-", which every ISO date contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthFilter {
    pattern: String,
}

impl MonthFilter {
    /// Create a filter for `month`, or an unconstrained filter if `month` is `None`.
    pub fn new(month: Option<&str>) -> Self {
        Self {
            pattern: format!("{}-", month.unwrap_or_default()),
        }
    }

    /// The substring a sale date must contain to match.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Selects transactions by month and, optionally, by a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    /// The month the transactions were sold in.
    pub month: MonthFilter,
    /// Text to look for in the title, description or price.
    ///
    /// `None` matches everything. Empty search strings are stored as `None`.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Create a filter from the raw `month` and `search` request parameters.
    pub fn new(month: Option<&str>, search: Option<&str>) -> Self {
        Self {
            month: MonthFilter::new(month),
            search: search
                .filter(|search| !search.is_empty())
                .map(str::to_owned),
        }
    }

    /// Build the SQL `WHERE` clause for this filter.
    pub(crate) fn where_clause(&self) -> WhereClause {
        let where_clause = WhereClause::for_month(&self.month);

        match &self.search {
            Some(search) => where_clause.and_search(search),
            None => where_clause,
        }
    }
}

/// A SQL `WHERE` clause and the values bound to its numbered parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    parameters: Vec<Value>,
}

impl WhereClause {
    /// Match transactions sold in the month selected by `month`.
    pub(crate) fn for_month(month: &MonthFilter) -> Self {
        let mut where_clause = Self {
            conditions: Vec::new(),
            parameters: Vec::new(),
        };
        let param = where_clause.bind(Value::Text(month.pattern().to_owned()));
        where_clause
            .conditions
            .push(format!("instr(date_of_sale, {param}) > 0"));

        where_clause
    }

    /// Also require `search` to appear in the title, description or price,
    /// ignoring case.
    ///
    /// The search is a plain substring match. The price is compared as text,
    /// with whole prices written without a decimal point, e.g. "10".
    pub(crate) fn and_search(mut self, search: &str) -> Self {
        let param = self.bind(Value::Text(search.to_lowercase()));
        self.conditions.push(format!(
            "(instr({UNICODE_LOWER}(title), {param}) > 0 \
            OR instr({UNICODE_LOWER}(description), {param}) > 0 \
            OR instr({PRICE_TEXT}(price), {param}) > 0)"
        ));

        self
    }

    /// Also require the sold flag to equal `sold`.
    pub(crate) fn and_sold(mut self, sold: bool) -> Self {
        let param = self.bind(Value::Integer(sold.into()));
        self.conditions.push(format!("sold = {param}"));

        self
    }

    /// Also require `min <= price <= max`, or just `min <= price` if `max` is `None`.
    pub(crate) fn and_price_between(mut self, min: f64, max: Option<f64>) -> Self {
        let min_param = self.bind(Value::Real(min));
        match max {
            Some(max) => {
                let max_param = self.bind(Value::Real(max));
                self.conditions
                    .push(format!("price BETWEEN {min_param} AND {max_param}"));
            }
            None => self.conditions.push(format!("price >= {min_param}")),
        }

        self
    }

    /// The SQL text, starting with `WHERE`.
    pub(crate) fn sql(&self) -> String {
        String::from("WHERE ") + &self.conditions.join(" AND ")
    }

    /// The values for the clause's numbered parameters, in order.
    pub(crate) fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    fn bind(&mut self, value: Value) -> String {
        self.parameters.push(value);
        format!("?{}", self.parameters.len())
    }
}

/// Which slice of the matching transactions to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The number of matching transactions to skip.
    pub offset: u64,
    /// The maximum number of transactions to return, `None` for no limit.
    pub limit: Option<u64>,
}

impl Pagination {
    /// Create the pagination window from the raw `page` and `perPage` request parameters.
    ///
    /// Skips `(page - 1) * per_page` transactions and returns at most
    /// `per_page` transactions, where `page` defaults to [DEFAULT_PAGE] and
    /// `per_page` defaults to [DEFAULT_PER_PAGE]. Malformed values do not
    /// cause an error:
    /// - the limit is read from the integer at the start of `per_page`, so
    ///   "10abc" and "10.0" both limit to 10,
    /// - a `per_page` that does not start with an integer disables the limit,
    /// - a zero `per_page` disables the limit,
    /// - a negative `per_page` limits to its absolute value, at most [i64::MAX],
    /// - the offset needs both `page` and `per_page` to be integers and is
    ///   zero otherwise,
    /// - and a negative offset is clamped to zero.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Self {
        let limit = match per_page {
            Some(per_page) => leading_integer_magnitude(per_page),
            None => Some(DEFAULT_PER_PAGE.unsigned_abs()),
        }
        .filter(|limit| *limit != 0)
        .map(|limit| limit.min(i64::MAX as u64));

        let page = parse_or_default(page, DEFAULT_PAGE);
        let per_page = parse_or_default(per_page, DEFAULT_PER_PAGE);
        let offset = page
            .zip(per_page)
            .map(|(page, per_page)| page.saturating_sub(1).saturating_mul(per_page).max(0) as u64)
            .unwrap_or(0);

        Self { offset, limit }
    }

    /// The SQL `LIMIT ... OFFSET ...` text for this window.
    pub(crate) fn sql(&self) -> String {
        match self.limit {
            Some(limit) => format!("LIMIT {limit} OFFSET {}", self.offset),
            // SQLite needs a LIMIT before an OFFSET, a negative limit means no limit.
            None => format!("LIMIT -1 OFFSET {}", self.offset),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_params(None, None)
    }
}

/// `None` if `value` is present but not an integer.
fn parse_or_default(value: Option<&str>, default: i64) -> Option<i64> {
    match value {
        Some(value) => value.trim().parse().ok(),
        None => Some(default),
    }
}

/// The size of the integer at the start of `value`, ignoring leading
/// whitespace and the sign. Saturates at [u64::MAX].
///
/// `None` if `value` does not start with an integer.
fn leading_integer_magnitude(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if digits.is_empty() {
        return None;
    }

    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Get the transactions matching `filter` in the store's natural order,
/// restricted to the window described by `pagination`.
///
/// Pass `None` for `pagination` to get every matching transaction.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn get_transactions(
    filter: &TransactionFilter,
    pagination: Option<Pagination>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let where_clause = filter.where_clause();
    let pagination_clause = pagination
        .map(|pagination| pagination.sql())
        .unwrap_or_default();

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {} ORDER BY row_id ASC {}",
        where_clause.sql(),
        pagination_clause
    );

    connection
        .prepare(&query)?
        .query_map(
            params_from_iter(where_clause.parameters().iter()),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
