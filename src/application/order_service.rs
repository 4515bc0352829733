use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    ItemPatch, NewOrder, NewOrderItem, Order, OrderDetail, OrderItem, OrderPatch,
};
use crate::domain::ports::OrderStore;
use crate::domain::Principal;
use crate::gateways::{Lookup, ProductGateway};

use super::run_blocking;
use super::totals::recompute_total;

/// Order and order-item use cases. Every item mutation recomputes the
/// parent's total before returning.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    products: Arc<dyn ProductGateway>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, products: Arc<dyn ProductGateway>) -> Self {
        Self { store, products }
    }

    pub async fn list_orders(&self, caller: &Principal) -> Result<Vec<Order>, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.list_orders(&owner)).await
    }

    pub async fn get_order(
        &self,
        id: i64,
        caller: &Principal,
    ) -> Result<Option<OrderDetail>, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || {
            let Some(order) = store.find_order(id, &owner)? else {
                return Ok(None);
            };
            let items = store.items_for_order(id, &owner)?;
            Ok(Some(OrderDetail { order, items }))
        })
        .await
    }

    /// Create an order, optionally with items. Stock is checked for every
    /// item before anything is written.
    pub async fn create_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
        caller: &Principal,
    ) -> Result<OrderDetail, DomainError> {
        for item in &items {
            if item.order_id != order.id {
                return Err(DomainError::InvalidInput(format!(
                    "item {} belongs to order {}, not {}",
                    item.id, item.order_id, order.id
                )));
            }
            item.validate()?;
            self.ensure_in_stock(item.product_id, item.quantity).await?;
        }

        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        let detail = run_blocking(move || {
            let mut created = store.create_order(&order, &items, &owner)?;
            if !items.is_empty() {
                created.total_amount = recompute_total(store.as_ref(), created.id, &owner)?;
            }
            let items = store.items_for_order(created.id, &owner)?;
            Ok(OrderDetail {
                order: created,
                items,
            })
        })
        .await?;

        log::info!(
            "Order {} created by {} with {} item(s)",
            detail.order.id,
            caller.as_str(),
            detail.items.len()
        );
        Ok(detail)
    }

    pub async fn update_order(
        &self,
        id: i64,
        patch: OrderPatch,
        caller: &Principal,
    ) -> Result<bool, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.update_order(id, &patch, &owner)).await
    }

    pub async fn delete_order(&self, id: i64, caller: &Principal) -> Result<bool, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.delete_order(id, &owner)).await
    }

    pub async fn list_items(&self, caller: &Principal) -> Result<Vec<OrderItem>, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.list_items(&owner)).await
    }

    pub async fn get_item(
        &self,
        id: i64,
        caller: &Principal,
    ) -> Result<Option<OrderItem>, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || store.find_item(id, &owner)).await
    }

    pub async fn add_item(
        &self,
        item: NewOrderItem,
        caller: &Principal,
    ) -> Result<OrderItem, DomainError> {
        item.validate()?;
        self.ensure_in_stock(item.product_id, item.quantity).await?;

        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || {
            if store.find_order(item.order_id, &owner)?.is_none() {
                return Err(DomainError::NotFound("Order"));
            }
            let created = store.create_item(&item, &owner)?;
            recompute_total(store.as_ref(), created.order_id, &owner)?;
            Ok(created)
        })
        .await
    }

    pub async fn update_item(
        &self,
        id: i64,
        patch: ItemPatch,
        caller: &Principal,
    ) -> Result<Option<OrderItem>, DomainError> {
        let Some(current) = self.get_item(id, caller).await? else {
            return Ok(None);
        };
        if let Some(quantity) = patch.quantity.filter(|q| *q != current.quantity) {
            self.ensure_in_stock(current.product_id, quantity).await?;
        }

        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || {
            let updated = store.update_item(id, &patch, &owner)?;
            if let Some(item) = &updated {
                recompute_total(store.as_ref(), item.order_id, &owner)?;
            }
            Ok(updated)
        })
        .await
    }

    pub async fn remove_item(&self, id: i64, caller: &Principal) -> Result<bool, DomainError> {
        let store = self.store.clone();
        let owner = caller.as_str().to_owned();
        run_blocking(move || {
            let Some(item) = store.find_item(id, &owner)? else {
                return Ok(false);
            };
            let deleted = store.delete_item(id, &owner)?;
            if deleted {
                recompute_total(store.as_ref(), item.order_id, &owner)?;
            }
            Ok(deleted)
        })
        .await
    }

    async fn ensure_in_stock(&self, product_id: i64, quantity: i32) -> Result<(), DomainError> {
        match self.products.lookup_product(product_id).await {
            Lookup::Found(product) if product.quantity >= quantity => Ok(()),
            Lookup::Found(product) => Err(DomainError::InvalidInput(format!(
                "product {} has only {} in stock, {} requested",
                product_id, product.quantity, quantity
            ))),
            Lookup::Missing => Err(DomainError::InvalidInput(format!(
                "product {} does not exist",
                product_id
            ))),
            Lookup::Unavailable(reason) => Err(DomainError::DependencyUnavailable(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{new_order, product, InMemoryOrderStore, StubProductGateway};

    fn caller() -> Principal {
        Principal::new("alice")
    }

    fn line(id: i64, product_id: i64, quantity: i32, unit_price: f64) -> NewOrderItem {
        NewOrderItem {
            id,
            order_id: 1,
            product_id,
            product_name: format!("product-{product_id}"),
            quantity,
            unit_price,
        }
    }

    fn service() -> (OrderService, Arc<InMemoryOrderStore>) {
        let store = Arc::new(InMemoryOrderStore::default());
        let products = StubProductGateway::default()
            .with(product(7, 10.0, None, 10))
            .with(product(8, 5.0, None, 10));
        (
            OrderService::new(store.clone(), Arc::new(products)),
            store,
        )
    }

    #[actix_web::test]
    async fn creating_an_order_with_items_derives_its_total() {
        let (service, _) = service();
        let mut order = new_order(1);
        order.total_amount = 1_000.0;

        let detail = service
            .create_order(order, vec![line(1, 7, 2, 10.0), line(2, 8, 1, 5.0)], &caller())
            .await
            .expect("create order");

        assert_eq!(detail.order.total_amount, 25.0);
        assert_eq!(detail.items.len(), 2);
    }

    #[actix_web::test]
    async fn creating_an_order_without_items_keeps_the_seed() {
        let (service, _) = service();
        let mut order = new_order(1);
        order.total_amount = 12.5;

        let detail = service.create_order(order, vec![], &caller()).await.unwrap();

        assert_eq!(detail.order.total_amount, 12.5);
    }

    #[actix_web::test]
    async fn every_item_mutation_recomputes_the_total() {
        let (service, store) = service();
        service
            .create_order(new_order(1), vec![line(1, 7, 2, 10.0)], &caller())
            .await
            .unwrap();

        service.add_item(line(2, 8, 1, 5.0), &caller()).await.unwrap();
        assert_eq!(store.find_order(1, "alice").unwrap().unwrap().total_amount, 25.0);

        service
            .update_item(
                2,
                ItemPatch {
                    unit_price: Some(7.0),
                    ..Default::default()
                },
                &caller(),
            )
            .await
            .unwrap()
            .expect("item 2");
        assert_eq!(store.find_order(1, "alice").unwrap().unwrap().total_amount, 27.0);

        assert!(service.remove_item(1, &caller()).await.unwrap());
        assert_eq!(store.find_order(1, "alice").unwrap().unwrap().total_amount, 7.0);
    }

    #[actix_web::test]
    async fn insufficient_stock_is_rejected_before_writing() {
        let (service, store) = service();

        let err = service
            .create_order(new_order(1), vec![line(1, 7, 11, 10.0)], &caller())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(store.find_order(1, "alice").unwrap().is_none());
    }

    #[actix_web::test]
    async fn unknown_product_is_invalid_input() {
        let (service, _) = service();

        let err = service
            .create_order(new_order(1), vec![line(1, 99, 1, 1.0)], &caller())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[actix_web::test]
    async fn unreachable_product_service_is_a_dependency_failure() {
        let store = Arc::new(InMemoryOrderStore::default());
        let service = OrderService::new(store, Arc::new(StubProductGateway::unavailable()));

        let err = service
            .create_order(new_order(1), vec![line(1, 7, 1, 1.0)], &caller())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DependencyUnavailable(_)));
    }

    #[actix_web::test]
    async fn adding_an_item_to_a_missing_order_is_not_found() {
        let (service, _) = service();

        let err = service.add_item(line(1, 7, 1, 10.0), &caller()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound("Order")));
    }

    #[actix_web::test]
    async fn orders_are_invisible_to_other_owners() {
        let (service, _) = service();
        service
            .create_order(new_order(1), vec![], &caller())
            .await
            .unwrap();

        let other = Principal::new("mallory");
        assert!(service.get_order(1, &other).await.unwrap().is_none());
        assert!(!service.delete_order(1, &other).await.unwrap());
        assert!(service.get_order(1, &caller()).await.unwrap().is_some());
    }
}
