//! Heuristic reduction suggestions.
//!
//! Cosmetic business logic: fixed suggestion texts over the top emitters.
//! Deliberately not generalized.

use serde::Serialize;

use greenerp_core::SupplierId;
use greenerp_purchasing::Order;

/// Orders inspected per report.
const TOP_ORDERS: usize = 3;

/// Fraction of an order's emissions counted as achievable savings.
const SAVINGS_FACTOR: f64 = 0.3;

/// Fraction quoted as the reduction target in the suggestion text.
const TARGET_FACTOR: f64 = 0.2;

/// Points per qualifying order in the report score.
const SCORE_PER_ORDER: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub high_emission_item: String,
    pub total_co2: f64,
    pub suggestions: Vec<String>,
    pub potential_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<Recommendation>,
    pub ai_score: u64,
}

/// Build the recommendation report: the top orders by `total_co2` (nonzero
/// only) descending, each with fixed suggestion texts and a 30% "potential
/// savings" figure. With no qualifying orders, a single static placeholder.
pub fn recommendations<F>(orders: &[Order], supplier_name: F) -> Recommendations
where
    F: Fn(SupplierId) -> Option<String>,
{
    let mut emitting: Vec<&Order> = orders.iter().filter(|o| o.total_co2 > 0.0).collect();
    emitting.sort_by(|a, b| {
        b.total_co2
            .partial_cmp(&a.total_co2)
            .unwrap_or(core::cmp::Ordering::Equal)
    });
    emitting.truncate(TOP_ORDERS);

    let recommendations: Vec<Recommendation> = emitting
        .iter()
        .map(|order| {
            let supplier = supplier_name(order.supplier_id)
                .unwrap_or_else(|| "unknown supplier".to_string());
            Recommendation {
                high_emission_item: format!("Order {} ({supplier})", order.id),
                total_co2: order.total_co2,
                suggestions: vec![
                    "Switch to low-CO2 suppliers".to_string(),
                    "Review high-emission purchase orders".to_string(),
                    format!(
                        "Target 20% reduction ({:.1} kg CO2e)",
                        order.total_co2 * TARGET_FACTOR
                    ),
                ],
                potential_savings: order.total_co2 * SAVINGS_FACTOR,
            }
        })
        .collect();

    let ai_score = recommendations.len() as u64 * SCORE_PER_ORDER;

    if recommendations.is_empty() {
        return Recommendations {
            recommendations: vec![placeholder()],
            ai_score: 0,
        };
    }

    Recommendations {
        recommendations,
        ai_score,
    }
}

fn placeholder() -> Recommendation {
    Recommendation {
        high_emission_item: "No data yet".to_string(),
        total_co2: 0.0,
        suggestions: vec![
            "Create purchase orders to unlock insights".to_string(),
            "Add items with CO2 factors first".to_string(),
            "Recommendations are derived from real procurement data".to_string(),
        ],
        potential_savings: 0.0,
    }
}
