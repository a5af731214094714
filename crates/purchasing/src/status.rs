use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Purchase-order status lifecycle.
///
/// The lifecycle is nominally unrestricted: any status may be set to any
/// other, and callers may supply statuses this enum does not know about
/// (`Other` round-trips them verbatim). The single distinguished value is
/// `Received`, the fulfillment state — see [`stock_effect`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Draft,
    Submitted,
    Approved,
    Received,
    Cancelled,
    /// A caller-supplied status outside the known set, kept verbatim.
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Submitted => "submitted",
            OrderStatus::Approved => "approved",
            OrderStatus::Received => "received",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(s) => s,
        }
    }

    pub fn is_received(&self) -> bool {
        matches!(self, OrderStatus::Received)
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "draft" => OrderStatus::Draft,
            "submitted" => OrderStatus::Submitted,
            "approved" => OrderStatus::Approved,
            "received" => OrderStatus::Received,
            "cancelled" => OrderStatus::Cancelled,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        OrderStatus::from(s.as_str())
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(OrderStatus::from(s))
    }
}

/// Stock effect of a status transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockEffect {
    /// The order enters `received`: every line's item stock is incremented
    /// by the line quantity.
    ReceiveLines,
    /// No stock mutation.
    None,
}

/// Plan the stock effect of moving an order from `previous` to `next`.
///
/// The fulfillment side effect fires exactly once: entering `received` from
/// any non-`received` status restocks; staying in `received` does not (the
/// idempotency guard), and leaving `received` never decrements what a prior
/// receipt added.
pub fn stock_effect(previous: &OrderStatus, next: &OrderStatus) -> StockEffect {
    if next.is_received() && !previous.is_received() {
        StockEffect::ReceiveLines
    } else {
        StockEffect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_round_trip() {
        for s in ["draft", "submitted", "approved", "received", "cancelled"] {
            assert_eq!(OrderStatus::from(s).as_str(), s);
        }
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = OrderStatus::from("on_hold");
        assert_eq!(status, OrderStatus::Other("on_hold".to_string()));
        assert_eq!(status.as_str(), "on_hold");
    }

    #[test]
    fn status_serde_uses_plain_strings() {
        let json = serde_json::to_string(&OrderStatus::Received).unwrap();
        assert_eq!(json, "\"received\"");

        let parsed: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(parsed, OrderStatus::Other("on_hold".to_string()));
    }

    #[test]
    fn entering_received_restocks() {
        for from in ["draft", "submitted", "approved", "cancelled", "on_hold"] {
            assert_eq!(
                stock_effect(&OrderStatus::from(from), &OrderStatus::Received),
                StockEffect::ReceiveLines,
            );
        }
    }

    #[test]
    fn re_entering_received_is_idempotent() {
        assert_eq!(
            stock_effect(&OrderStatus::Received, &OrderStatus::Received),
            StockEffect::None,
        );
    }

    #[test]
    fn leaving_received_never_decrements() {
        for to in ["draft", "submitted", "cancelled", "on_hold"] {
            assert_eq!(
                stock_effect(&OrderStatus::Received, &OrderStatus::from(to)),
                StockEffect::None,
            );
        }
    }

    #[test]
    fn neutral_transitions_have_no_effect() {
        assert_eq!(
            stock_effect(&OrderStatus::Draft, &OrderStatus::Approved),
            StockEffect::None,
        );
    }
}
