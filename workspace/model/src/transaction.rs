use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Represents a single purchase made by a customer.
///
/// Many transactions exist per customer; rows have no identity beyond their
/// position in the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    customer_id: String,
    order_date: NaiveDateTime,
    purchase_amount: Decimal,
    currency: String,
}

impl Transaction {
    /// Creates a new Transaction.
    pub fn new(
        customer_id: impl Into<String>,
        order_date: NaiveDateTime,
        purchase_amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            order_date,
            purchase_amount,
            currency: currency.into(),
        }
    }

    /// Creates a new Transaction placed at midnight of the given day.
    pub fn on_day(
        customer_id: impl Into<String>,
        date: NaiveDate,
        purchase_amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self::new(
            customer_id,
            date.and_time(chrono::NaiveTime::MIN),
            purchase_amount,
            currency,
        )
    }

    /// Gets the id of the customer who placed the order.
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Gets the timestamp of the order.
    pub fn order_date(&self) -> NaiveDateTime {
        self.order_date
    }

    /// Gets the calendar day of the order; date filters compare on this.
    pub fn date(&self) -> NaiveDate {
        self.order_date.date()
    }

    /// Gets the amount paid.
    pub fn purchase_amount(&self) -> Decimal {
        self.purchase_amount
    }

    /// Gets the ISO currency code of the amount.
    pub fn currency(&self) -> &str {
        &self.currency
    }
}
