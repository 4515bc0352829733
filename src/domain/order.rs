use chrono::{DateTime, Utc};

use super::errors::DomainError;

pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: f64,
    pub status: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub owner: String,
}

/// An order together with its line items, as served by `GET /orders/{id}`.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    /// Initial seed only; overwritten by the next total recomputation.
    pub total_amount: f64,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl NewOrderItem {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_line(self.quantity, self.unit_price)
    }

    pub fn total_price(&self) -> f64 {
        line_total(self.quantity, self.unit_price)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<f64>,
}

impl ItemPatch {
    /// Apply the patch to `item`, keeping `total_price` in step with the new
    /// quantity and unit price.
    pub fn apply(&self, item: &OrderItem) -> Result<OrderItem, DomainError> {
        let quantity = self.quantity.unwrap_or(item.quantity);
        let unit_price = self.unit_price.unwrap_or(item.unit_price);
        validate_line(quantity, unit_price)?;
        Ok(OrderItem {
            product_name: self
                .product_name
                .clone()
                .unwrap_or_else(|| item.product_name.clone()),
            quantity,
            unit_price,
            total_price: line_total(quantity, unit_price),
            ..item.clone()
        })
    }
}

pub fn line_total(quantity: i32, unit_price: f64) -> f64 {
    f64::from(quantity) * unit_price
}

pub fn validate_line(quantity: i32, unit_price: f64) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "unit_price must be a non-negative number, got {unit_price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> OrderItem {
        OrderItem {
            id: 1,
            order_id: 10,
            product_id: 7,
            product_name: "Widget".to_string(),
            quantity: 2,
            unit_price: 10.0,
            total_price: 20.0,
            owner: "alice".to_string(),
        }
    }

    #[test]
    fn patch_recomputes_total_price() {
        let patch = ItemPatch {
            quantity: Some(3),
            ..Default::default()
        };
        let updated = patch.apply(&item()).expect("valid patch");
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.total_price, 30.0);
        assert_eq!(updated.product_name, "Widget");
    }

    #[test]
    fn patch_rejects_zero_quantity() {
        let patch = ItemPatch {
            quantity: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            patch.apply(&item()),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_unit_price_is_invalid() {
        assert!(validate_line(1, -0.5).is_err());
        assert!(validate_line(1, 0.0).is_ok());
    }
}
