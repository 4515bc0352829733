use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ItemPatch, NewOrder, NewOrderItem, Order, OrderItem, OrderPatch};
use crate::domain::ports::OrderStore;
use crate::schema::{order_items, orders};

use super::conflict_as;
use super::models::{
    NewOrderItemRow, NewOrderRow, OrderChangeset, OrderItemChangeset, OrderItemRow, OrderRow,
};

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for DieselOrderStore {
    fn create_order(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
        owner: &str,
    ) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let created: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow::new(order, owner))
                .returning(OrderRow::as_returning())
                .get_result(conn)
                .map_err(conflict_as("Order"))?;

            if !items.is_empty() {
                let rows: Vec<NewOrderItemRow> =
                    items.iter().map(|i| NewOrderItemRow::new(i, owner)).collect();
                diesel::insert_into(order_items::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(conflict_as("Order item"))?;
            }

            Ok(created.into())
        })
    }

    fn find_order(&self, id: i64, owner: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::owner.eq(owner))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(order.map(Order::from))
    }

    fn list_orders(&self, owner: &str) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::owner.eq(owner))
            .select(OrderRow::as_select())
            .order(orders::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    fn update_order(&self, id: i64, patch: &OrderPatch, owner: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::owner.eq(owner)),
        )
        .set(&OrderChangeset::new(patch, Utc::now()))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn delete_order(&self, id: i64, owner: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // order_items rows go with it through ON DELETE CASCADE.
        let deleted = diesel::delete(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::owner.eq(owner)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn write_total(
        &self,
        order_id: i64,
        owner: &str,
        total: f64,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::owner.eq(owner)),
        )
        .set((orders::total_amount.eq(total), orders::updated_at.eq(at)))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn create_item(&self, item: &NewOrderItem, owner: &str) -> Result<OrderItem, DomainError> {
        let mut conn = self.pool.get()?;

        let created: OrderItemRow = diesel::insert_into(order_items::table)
            .values(&NewOrderItemRow::new(item, owner))
            .returning(OrderItemRow::as_returning())
            .get_result(&mut conn)
            .map_err(conflict_as("Order item"))?;

        Ok(created.into())
    }

    fn find_item(&self, id: i64, owner: &str) -> Result<Option<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let item = order_items::table
            .filter(order_items::id.eq(id))
            .filter(order_items::owner.eq(owner))
            .select(OrderItemRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(item.map(OrderItem::from))
    }

    fn list_items(&self, owner: &str) -> Result<Vec<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_items::table
            .filter(order_items::owner.eq(owner))
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    fn items_for_order(&self, order_id: i64, owner: &str) -> Result<Vec<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .filter(order_items::owner.eq(owner))
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    fn update_item(
        &self,
        id: i64,
        patch: &ItemPatch,
        owner: &str,
    ) -> Result<Option<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = order_items::table
                .filter(order_items::id.eq(id))
                .filter(order_items::owner.eq(owner))
                .select(OrderItemRow::as_select())
                .first(conn)
                .optional()?;

            let Some(current) = current else {
                return Ok(None);
            };

            let changes = OrderItemChangeset::apply(patch, &current.into())?;
            let updated: OrderItemRow = diesel::update(order_items::table.find(id))
                .set(&changes)
                .returning(OrderItemRow::as_returning())
                .get_result(conn)?;

            Ok(Some(updated.into()))
        })
    }

    fn delete_item(&self, id: i64, owner: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            order_items::table
                .filter(order_items::id.eq(id))
                .filter(order_items::owner.eq(owner)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
