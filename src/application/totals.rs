use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::ports::OrderStore;

/// Recompute an order's `total_amount` from its items and store it.
///
/// The stored total is a cache of `Σ item.total_price` over the items scoped
/// to `(order_id, owner)`. Running this twice without an item change in
/// between writes the same value.
pub fn recompute_total<S>(store: &S, order_id: i64, owner: &str) -> Result<f64, DomainError>
where
    S: OrderStore + ?Sized,
{
    let total: f64 = store
        .items_for_order(order_id, owner)?
        .iter()
        .map(|item| item.total_price)
        .sum();

    store.write_total(order_id, owner, total, Utc::now())?;
    log::debug!("Order {} total recomputed: {}", order_id, total);
    Ok(total)
}
