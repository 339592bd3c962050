use super::Transaction;

/// Create an unsold "electronics" transaction with the given `id`, `price` and sale date.
///
/// Override other fields with struct update syntax.
pub fn sample_transaction(id: i64, price: f64, date_of_sale: &str) -> Transaction {
    Transaction {
        id,
        title: format!("Product #{id}"),
        description: format!("Description of product #{id}"),
        price,
        category: "electronics".to_owned(),
        sold: false,
        date_of_sale: date_of_sale.to_owned(),
        image: Some(format!("https://example.com/img/{id}.jpg")),
    }
}
