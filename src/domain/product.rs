use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Purchase cost per unit, when known.
    pub cost: Option<f64>,
    pub quantity: i32,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub cost: Option<f64>,
    pub quantity: i32,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_stock(self.price, self.cost, self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub quantity: Option<i32>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_stock(
            self.price.unwrap_or(0.0),
            self.cost,
            self.quantity.unwrap_or(0),
        )
    }
}

fn validate_stock(price: f64, cost: Option<f64>, quantity: i32) -> Result<(), DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    if let Some(cost) = cost.filter(|c| !c.is_finite() || *c < 0.0) {
        return Err(DomainError::InvalidInput(format!(
            "cost must be a non-negative number, got {cost}"
        )));
    }
    if quantity < 0 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must not be negative, got {quantity}"
        )));
    }
    Ok(())
}

/// What a stock reduction does to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// The reduction reaches or exceeds the stock: the product is deleted.
    Remove,
    Decrement { remaining: i32 },
}

impl StockChange {
    pub fn plan(current: i32, amount: i32) -> Result<Self, DomainError> {
        if amount <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if amount >= current {
            Ok(StockChange::Remove)
        } else {
            Ok(StockChange::Decrement {
                remaining: current - amount,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockOutcome {
    Removed { name: String },
    Reduced { name: String, remaining: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reducing_by_the_whole_stock_removes_the_product() {
        assert_eq!(StockChange::plan(5, 5).unwrap(), StockChange::Remove);
    }

    #[test]
    fn reducing_beyond_the_stock_removes_the_product() {
        assert_eq!(StockChange::plan(5, 9).unwrap(), StockChange::Remove);
    }

    #[test]
    fn reducing_below_the_stock_decrements_exactly() {
        assert_eq!(
            StockChange::plan(5, 3).unwrap(),
            StockChange::Decrement { remaining: 2 }
        );
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        assert!(matches!(
            StockChange::plan(5, 0),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(StockChange::plan(5, -1).is_err());
    }

    #[test]
    fn negative_cost_is_rejected() {
        let product = NewProduct {
            id: 1,
            name: "Lamp".to_string(),
            description: String::new(),
            price: 10.0,
            cost: Some(-1.0),
            quantity: 3,
        };
        assert!(product.validate().is_err());
    }
}
