use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ReportStore;
use crate::domain::report::{
    NewOrderReport, NewProductReport, OrderReport, OrderReportView, ProductReport,
    ProductStatistics,
};
use crate::schema::{order_reports, product_reports};

use super::conflict_as;
use super::models::{NewOrderReportRow, NewProductReportRow, OrderReportRow, ProductReportRow};

pub struct DieselReportStore {
    pool: DbPool,
}

impl DieselReportStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Resolve an order-report key: order id first, then surrogate id.
fn resolve(conn: &mut PgConnection, key: i64) -> QueryResult<Option<OrderReportRow>> {
    let by_order = order_reports::table
        .filter(order_reports::order_id.eq(key))
        .select(OrderReportRow::as_select())
        .first(conn)
        .optional()?;
    if by_order.is_some() {
        return Ok(by_order);
    }
    order_reports::table
        .find(key)
        .select(OrderReportRow::as_select())
        .first(conn)
        .optional()
}

impl ReportStore for DieselReportStore {
    fn create_order_report(
        &self,
        report: &NewOrderReport,
        lines: &[NewProductReport],
    ) -> Result<OrderReportView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let created: OrderReportRow = diesel::insert_into(order_reports::table)
                .values(&NewOrderReportRow::from(report))
                .returning(OrderReportRow::as_returning())
                .get_result(conn)
                .map_err(conflict_as("Order report"))?;

            let children: Vec<ProductReportRow> = if lines.is_empty() {
                Vec::new()
            } else {
                let rows: Vec<NewProductReportRow> =
                    lines.iter().map(NewProductReportRow::new).collect();
                diesel::insert_into(product_reports::table)
                    .values(&rows)
                    .returning(ProductReportRow::as_returning())
                    .get_results(conn)?
            };

            Ok(OrderReportView {
                report: created.into(),
                product_reports: children.into_iter().map(ProductReport::from).collect(),
            })
        })
    }

    fn find_order_report(&self, key: i64) -> Result<Option<OrderReport>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(resolve(&mut conn, key)?.map(OrderReport::from))
    }

    fn find_order_report_by_order_id(
        &self,
        order_id: i64,
    ) -> Result<Option<OrderReport>, DomainError> {
        let mut conn = self.pool.get()?;

        let report = order_reports::table
            .filter(order_reports::order_id.eq(order_id))
            .select(OrderReportRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(report.map(OrderReport::from))
    }

    fn list_order_reports(&self) -> Result<Vec<OrderReport>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_reports::table
            .select(OrderReportRow::as_select())
            .order(order_reports::created_at.desc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(OrderReport::from).collect())
    }

    fn delete_order_report(&self, key: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let Some(report) = resolve(conn, key)? else {
                return Ok(false);
            };

            let children = diesel::delete(
                product_reports::table.filter(product_reports::order_report_id.eq(report.order_id)),
            )
            .execute(conn)?;
            diesel::delete(order_reports::table.find(report.id)).execute(conn)?;

            log::debug!(
                "Deleted order report {} and {} product report(s)",
                report.order_id,
                children
            );
            Ok(true)
        })
    }

    fn create_product_report(
        &self,
        report: &NewProductReport,
    ) -> Result<ProductReport, DomainError> {
        let mut conn = self.pool.get()?;

        let created: ProductReportRow = diesel::insert_into(product_reports::table)
            .values(&NewProductReportRow::new(report))
            .returning(ProductReportRow::as_returning())
            .get_result(&mut conn)?;

        Ok(created.into())
    }

    fn find_product_report(&self, id: Uuid) -> Result<Option<ProductReport>, DomainError> {
        let mut conn = self.pool.get()?;

        let report = product_reports::table
            .find(id)
            .select(ProductReportRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(report.map(ProductReport::from))
    }

    fn list_product_reports(&self) -> Result<Vec<ProductReport>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = product_reports::table
            .select(ProductReportRow::as_select())
            .order(product_reports::created_at.desc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(ProductReport::from).collect())
    }

    fn product_reports_for(
        &self,
        order_report_id: i64,
    ) -> Result<Vec<ProductReport>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = product_reports::table
            .filter(product_reports::order_report_id.eq(order_report_id))
            .select(ProductReportRow::as_select())
            .order(product_reports::created_at.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(ProductReport::from).collect())
    }

    fn delete_product_report(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(product_reports::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn product_statistics(
        &self,
        product_id: i64,
    ) -> Result<Option<ProductStatistics>, DomainError> {
        let mut conn = self.pool.get()?;

        let (count, sold, revenue, cost, profit): (
            i64,
            Option<i64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
        ) = product_reports::table
            .filter(product_reports::product_id.eq(product_id))
            .select((
                count_star(),
                sum(product_reports::total_sold),
                sum(product_reports::revenue),
                sum(product_reports::cost),
                sum(product_reports::profit),
            ))
            .first(&mut conn)?;

        if count == 0 {
            return Ok(None);
        }

        Ok(Some(ProductStatistics {
            product_id,
            total_sold: sold.unwrap_or_default(),
            total_revenue: revenue.unwrap_or_default(),
            total_cost: cost.unwrap_or_default(),
            total_profit: profit.unwrap_or_default(),
        }))
    }
}
