use std::collections::HashMap;

use serde::Serialize;

use greenerp_catalog::Item;
use greenerp_core::{ItemId, SupplierId};
use greenerp_purchasing::{Order, OrderLine};

/// Accumulated emissions attributed to one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemEmissions {
    pub item_id: ItemId,
    pub item_name: String,
    pub sku: String,
    pub co2_per_unit: f64,
    pub total_co2_from_orders: f64,
}

/// For every item, sum `line_co2` across all order lines referencing it.
/// Items never ordered report zero.
pub fn emissions_by_item(items: &[Item], lines: &[OrderLine]) -> Vec<ItemEmissions> {
    let mut per_item: HashMap<ItemId, f64> = HashMap::new();
    for line in lines {
        *per_item.entry(line.item_id).or_default() += line.line_co2;
    }

    items
        .iter()
        .map(|item| ItemEmissions {
            item_id: item.id,
            item_name: item.name.clone(),
            sku: item.sku.clone(),
            co2_per_unit: item.co2_per_unit,
            total_co2_from_orders: per_item.get(&item.id).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Accumulated emissions across one supplier's orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierEmissions {
    pub supplier_id: SupplierId,
    /// `None` when the supplier row was deleted after orders referenced it.
    pub supplier_name: Option<String>,
    pub total_co2: f64,
    pub order_count: u64,
}

/// Group orders by supplier, summing `total_co2` and counting orders.
///
/// Output order follows first appearance in `orders` so repeated report
/// reads are stable.
pub fn emissions_by_supplier<F>(orders: &[Order], supplier_name: F) -> Vec<SupplierEmissions>
where
    F: Fn(SupplierId) -> Option<String>,
{
    let mut grouped: Vec<SupplierEmissions> = Vec::new();

    for order in orders {
        match grouped.iter_mut().find(|g| g.supplier_id == order.supplier_id) {
            Some(group) => {
                group.total_co2 += order.total_co2;
                group.order_count += 1;
            }
            None => grouped.push(SupplierEmissions {
                supplier_id: order.supplier_id,
                supplier_name: supplier_name(order.supplier_id),
                total_co2: order.total_co2,
                order_count: 1,
            }),
        }
    }

    grouped
}
