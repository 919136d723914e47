//! Status enums for orders, inventory operations and order preparation.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Draft,
    Confirmed,
    InPreparation,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::InPreparation => write!(f, "in_preparation"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "confirmed" => Ok(Self::Confirmed),
            "in_preparation" => Ok(Self::InPreparation),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Kind of inventory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "operation_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Goods received from a supplier.
    Reception,
    /// Goods leaving the warehouse.
    Sortie,
    /// Manual stock correction.
    Ajustement,
    /// Move between locations.
    Transfert,
    /// In-house production.
    Fabrication,
}

/// Processing status of an inventory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "operation_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    Draft,
    EnCours,
    Completed,
    Cancelled,
}

/// Coarse preparation state of a whole order, as shown on the production
/// summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationStatus {
    /// Every line can be picked entirely from stock.
    Prepared,
    /// Some stock is picked and some quantity still needs producing.
    PartiallyPrepared,
    /// Nothing is picked yet but running fabrication covers part of it.
    #[serde(rename = "en_cours")]
    InProduction,
    /// Neither stock nor running fabrication covers the order.
    #[serde(rename = "non_prepare")]
    NotPrepared,
}

impl std::fmt::Display for PreparationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prepared => write!(f, "prepared"),
            Self::PartiallyPrepared => write!(f, "partially_prepared"),
            Self::InProduction => write!(f, "en_cours"),
            Self::NotPrepared => write!(f, "non_prepare"),
        }
    }
}

/// Availability of a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAvailability {
    /// The whole line is picked from stock.
    Available,
    /// Part of the line is picked from stock.
    Partial,
    /// Nothing picked, but running fabrication covers some of it.
    InProduction,
    /// No coverage at all.
    Missing,
}

impl std::fmt::Display for LineAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Partial => write!(f, "partial"),
            Self::InProduction => write!(f, "in_production"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trips_through_str() {
        for status in [
            OrderStatus::Draft,
            OrderStatus::Confirmed,
            OrderStatus::InPreparation,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert!("archived".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_preparation_status_wire_names() {
        let json = serde_json::to_string(&PreparationStatus::InProduction).unwrap_or_default();
        assert_eq!(json, "\"en_cours\"");
        let json = serde_json::to_string(&PreparationStatus::NotPrepared).unwrap_or_default();
        assert_eq!(json, "\"non_prepare\"");
        assert_eq!(PreparationStatus::PartiallyPrepared.to_string(), "partially_prepared");
    }

    #[test]
    fn test_operation_status_uses_snake_case() {
        let json = serde_json::to_string(&OperationStatus::EnCours).unwrap_or_default();
        assert_eq!(json, "\"en_cours\"");
    }
}
