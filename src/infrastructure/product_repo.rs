use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductStore;
use crate::domain::product::{NewProduct, Product, ProductPatch, StockChange, StockOutcome};
use crate::schema::products;

use super::conflict_as;
use super::models::{NewProductRow, ProductChangeset, ProductRow};

pub struct DieselProductStore {
    pool: DbPool,
}

impl DieselProductStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductStore for DieselProductStore {
    fn create(&self, product: &NewProduct, owner: &str) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let created: ProductRow = diesel::insert_into(products::table)
            .values(&NewProductRow::new(product, owner))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .map_err(conflict_as("Product"))?;

        Ok(created.into())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let product = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(product.map(Product::from))
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn update(&self, id: i64, patch: &ProductPatch, owner: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::owner.eq(owner)),
        )
        .set(&ProductChangeset::new(patch, Utc::now()))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn reduce_stock(
        &self,
        id: i64,
        amount: i32,
        owner: &str,
    ) -> Result<Option<StockOutcome>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = products::table
                .filter(products::id.eq(id))
                .filter(products::owner.eq(owner))
                .select(ProductRow::as_select())
                .for_update()
                .get_result(conn)
                .optional()?;

            let Some(current) = current else {
                return Ok(None);
            };

            let outcome = match StockChange::plan(current.quantity, amount)? {
                StockChange::Remove => {
                    diesel::delete(products::table.find(id)).execute(conn)?;
                    StockOutcome::Removed { name: current.name }
                }
                StockChange::Decrement { remaining } => {
                    diesel::update(products::table.find(id))
                        .set((
                            products::quantity.eq(remaining),
                            products::updated_at.eq(Utc::now()),
                        ))
                        .execute(conn)?;
                    StockOutcome::Reduced {
                        name: current.name,
                        remaining,
                    }
                }
            };

            Ok(Some(outcome))
        })
    }
}
