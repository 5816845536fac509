use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Order lifecycle state as reported by the backend.
///
/// Values outside the known set are carried as [`OrderStatus::Other`] so a
/// newer backend never breaks rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Placed,
    Confirms,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    /// Happy-path progression used by the tracking timeline.
    pub const PROGRESS: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Confirms,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Confirms => "CONFIRMS",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Position in [`OrderStatus::PROGRESS`], `None` for cancelled or unknown values.
    pub fn progress_index(&self) -> Option<usize> {
        Self::PROGRESS.iter().position(|stage| stage == self)
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PLACED" => OrderStatus::Placed,
            "CONFIRMS" => OrderStatus::Confirms,
            "PROCESSING" => OrderStatus::Processing,
            "SHIPPED" => OrderStatus::Shipped,
            "DELIVERED" => OrderStatus::Delivered,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized medicine snapshot stored on an order line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderedMedicine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub medicine_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[schema(value_type = String, example = "PLACED")]
    pub order_item_status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub medicine: OrderedMedicine,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// One backend-recorded transition of an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusHistory {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[schema(value_type = String, example = "SHIPPED")]
    pub status: OrderStatus,
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub total: Decimal,
    #[schema(value_type = String, example = "PLACED")]
    pub status: OrderStatus,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_history: Option<Vec<OrderStatusHistory>>,
}

impl Order {
    /// Short human reference shown in listings, e.g. `#3F2A9C1B`.
    pub fn reference(&self) -> String {
        let short: String = self.id.chars().take(8).collect();
        short.to_uppercase()
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
}
