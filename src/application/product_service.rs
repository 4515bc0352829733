use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductStore;
use crate::domain::product::{NewProduct, Product, ProductPatch, StockOutcome};
use crate::domain::Principal;

use super::run_blocking;

pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.list()).await
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.find_by_id(id)).await
    }

    pub async fn create_product(
        &self,
        product: NewProduct,
        caller: &Principal,
    ) -> Result<Product, DomainError> {
        product.validate()?;
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.create(&product, &owner)).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
        caller: &Principal,
    ) -> Result<bool, DomainError> {
        patch.validate()?;
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.update(id, &patch, &owner)).await
    }

    /// Take `amount` units out of stock; the product is deleted once the
    /// reduction reaches its stock level.
    pub async fn reduce_stock(
        &self,
        id: i64,
        amount: i32,
        caller: &Principal,
    ) -> Result<Option<StockOutcome>, DomainError> {
        if amount <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "amount must be positive, got {amount}"
            )));
        }
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        let outcome = run_blocking(move || store.reduce_stock(id, amount, &owner)).await?;
        if let Some(StockOutcome::Removed { name }) = &outcome {
            log::info!("Product {} ({}) sold out and removed", id, name);
        }
        Ok(outcome)
    }
}
