use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greenerp_catalog::Item;
use greenerp_core::{DomainError, DomainResult, ItemId, OrderId, OrderLineId, SupplierId, UserId};

use crate::status::OrderStatus;

/// A purchase order.
///
/// `total_amount` and `total_co2` are computed once at creation from the
/// priced lines and are not kept incrementally consistent afterwards (no
/// line-edit operation exists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub supplier_id: SupplierId,
    pub created_by: UserId,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub total_co2: f64,
    pub created_at: DateTime<Utc>,
}

/// One line of a purchase order.
///
/// `line_co2` snapshots `quantity × item.co2_per_unit` at creation time and
/// is never re-derived if the item's factor changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_co2: f64,
}

/// A requested order line, before item resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRequest {
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: f64,
}

/// A line whose item resolved, with its emissions contribution computed.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_co2: f64,
}

/// The outcome of pricing a set of line requests.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total_amount: f64,
    pub total_co2: f64,
    /// Item ids that did not resolve. Unknown items are skipped, not an
    /// error; the caller decides whether to surface them (the API logs them
    /// at warn).
    pub skipped: Vec<ItemId>,
}

/// Price a set of line requests against the catalog.
///
/// `co2_per_unit` resolves an item id to its emission factor; `None` marks
/// the item as unknown and the line is skipped. Totals accumulate over the
/// resolved lines only.
pub fn price_lines<F>(requests: &[LineRequest], co2_per_unit: F) -> DomainResult<PricedOrder>
where
    F: Fn(ItemId) -> Option<f64>,
{
    if requests.is_empty() {
        return Err(DomainError::validation("at least one order line is required"));
    }

    let mut lines = Vec::with_capacity(requests.len());
    let mut skipped = Vec::new();
    let mut total_amount = 0.0;
    let mut total_co2 = 0.0;

    for request in requests {
        let Some(factor) = co2_per_unit(request.item_id) else {
            skipped.push(request.item_id);
            continue;
        };

        let line_co2 = request.quantity as f64 * factor;
        total_amount += request.quantity as f64 * request.unit_price;
        total_co2 += line_co2;

        lines.push(PricedLine {
            item_id: request.item_id,
            quantity: request.quantity,
            unit_price: request.unit_price,
            line_co2,
        });
    }

    Ok(PricedOrder {
        lines,
        total_amount,
        total_co2,
        skipped,
    })
}

impl Order {
    /// Assemble a persisted order and its lines from a priced request.
    ///
    /// Returns the order and its line rows as one unit; the store commits
    /// them atomically.
    pub fn create(
        supplier_id: SupplierId,
        created_by: UserId,
        status: OrderStatus,
        priced: PricedOrder,
        now: DateTime<Utc>,
    ) -> (Self, Vec<OrderLine>) {
        let order_id = OrderId::new();

        let lines = priced
            .lines
            .into_iter()
            .map(|line| OrderLine {
                id: OrderLineId::new(),
                order_id,
                item_id: line.item_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_co2: line.line_co2,
            })
            .collect();

        let order = Self {
            id: order_id,
            supplier_id,
            created_by,
            status,
            order_date: now,
            total_amount: priced.total_amount,
            total_co2: priced.total_co2,
            created_at: now,
        };

        (order, lines)
    }

    /// The stock increments a fulfillment of this order's lines applies.
    pub fn restock_plan(lines: &[OrderLine]) -> Vec<(ItemId, i64)> {
        lines.iter().map(|l| (l.item_id, l.quantity)).collect()
    }
}

/// Resolve an emission-factor lookup from a slice of catalog items.
pub fn co2_lookup(items: &[Item]) -> impl Fn(ItemId) -> Option<f64> + '_ {
    move |id| items.iter().find(|i| i.id == id).map(|i| i.co2_per_unit)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn request(item_id: ItemId, quantity: i64, unit_price: f64) -> LineRequest {
        LineRequest {
            item_id,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn totals_accumulate_over_lines() {
        let a = ItemId::new();
        let b = ItemId::new();
        let factors = move |id| {
            if id == a {
                Some(2.0)
            } else if id == b {
                Some(1.0)
            } else {
                None
            }
        };

        let priced =
            price_lines(&[request(a, 3, 10.0), request(b, 2, 5.0)], factors).unwrap();

        assert_eq!(priced.total_amount, 40.0);
        assert_eq!(priced.total_co2, 8.0);
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].line_co2, 6.0);
        assert_eq!(priced.lines[1].line_co2, 2.0);
        assert!(priced.skipped.is_empty());
    }

    #[test]
    fn unknown_item_is_skipped_not_an_error() {
        let known = ItemId::new();
        let unknown = ItemId::new();
        let factors = move |id| (id == known).then_some(2.0);

        let priced = price_lines(
            &[request(unknown, 5, 100.0), request(known, 3, 10.0)],
            factors,
        )
        .unwrap();

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].item_id, known);
        assert_eq!(priced.total_amount, 30.0);
        assert_eq!(priced.total_co2, 6.0);
        assert_eq!(priced.skipped, vec![unknown]);
    }

    #[test]
    fn all_lines_unknown_yields_empty_order_not_error() {
        let priced = price_lines(&[request(ItemId::new(), 1, 1.0)], |_| None).unwrap();
        assert!(priced.lines.is_empty());
        assert_eq!(priced.total_amount, 0.0);
        assert_eq!(priced.total_co2, 0.0);
        assert_eq!(priced.skipped.len(), 1);
    }

    #[test]
    fn empty_request_is_a_validation_error() {
        assert!(matches!(
            price_lines(&[], |_| Some(1.0)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_links_lines_to_the_order() {
        let item = ItemId::new();
        let priced = price_lines(&[request(item, 4, 2.5)], |_| Some(0.5)).unwrap();

        let now = Utc::now();
        let (order, lines) = Order::create(
            SupplierId::new(),
            UserId::new(),
            OrderStatus::Draft,
            priced,
            now,
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].order_id, order.id);
        assert_eq!(order.total_amount, 10.0);
        assert_eq!(order.total_co2, 2.0);
        assert_eq!(order.order_date, now);
    }

    #[test]
    fn restock_plan_mirrors_line_quantities() {
        let a = ItemId::new();
        let b = ItemId::new();
        let priced =
            price_lines(&[request(a, 3, 1.0), request(b, 7, 1.0)], |_| Some(1.0)).unwrap();
        let (_, lines) =
            Order::create(SupplierId::new(), UserId::new(), OrderStatus::Draft, priced, Utc::now());

        assert_eq!(Order::restock_plan(&lines), vec![(a, 3), (b, 7)]);
    }

    proptest! {
        /// Totals always equal the fold over the resolved lines, and every
        /// request either resolves or is reported skipped.
        #[test]
        fn totals_match_line_fold(
            specs in prop::collection::vec((0i64..1_000, 0.0f64..1_000.0, 0.0f64..50.0, any::<bool>()), 1..20)
        ) {
            let requests: Vec<(LineRequest, Option<f64>)> = specs
                .iter()
                .map(|(quantity, unit_price, factor, known)| {
                    (
                        request(ItemId::new(), *quantity, *unit_price),
                        known.then_some(*factor),
                    )
                })
                .collect();

            let factors: std::collections::HashMap<ItemId, f64> = requests
                .iter()
                .filter_map(|(r, f)| f.map(|f| (r.item_id, f)))
                .collect();

            let inputs: Vec<LineRequest> = requests.iter().map(|(r, _)| r.clone()).collect();
            let priced = price_lines(&inputs, |id| factors.get(&id).copied()).unwrap();

            let amount: f64 = priced
                .lines
                .iter()
                .map(|l| l.quantity as f64 * l.unit_price)
                .sum();
            let co2: f64 = priced.lines.iter().map(|l| l.line_co2).sum();

            prop_assert!((priced.total_amount - amount).abs() < 1e-6);
            prop_assert!((priced.total_co2 - co2).abs() < 1e-6);
            prop_assert_eq!(priced.lines.len() + priced.skipped.len(), inputs.len());
        }
    }
}
