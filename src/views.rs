//! Render-ready view models for the order pages and the reviews hub.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cancellation::can_cancel;
use crate::models::{DeliveredMedicine, Order, OrderItem, Review};
use crate::status::StatusView;
use crate::tracking::Timeline;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryView {
    pub id: String,
    pub reference: String,
    pub status: StatusView,
    pub total: Decimal,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
    pub can_cancel: bool,
    pub detail_url: String,
}

impl OrderSummaryView {
    pub fn of(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            reference: order.reference(),
            status: StatusView::of(&order.status),
            total: order.total,
            item_count: order.items.len(),
            created_at: order.created_at,
            can_cancel: can_cancel(&order.status),
            detail_url: format!("/orders/{}", order.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub item: OrderItem,
    pub status: StatusView,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub order: Order,
    pub reference: String,
    pub status: StatusView,
    pub lines: Vec<OrderLineView>,
    pub can_cancel: bool,
    pub track_url: String,
}

impl OrderDetailView {
    pub fn of(order: Order) -> Self {
        let lines = order
            .items
            .iter()
            .map(|item| OrderLineView {
                status: StatusView::of(&item.order_item_status),
                line_total: item.line_total(),
                item: item.clone(),
            })
            .collect();
        Self {
            reference: order.reference(),
            status: StatusView::of(&order.status),
            can_cancel: can_cancel(&order.status),
            track_url: format!("/orders/{}/track", order.id),
            lines,
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub order_id: String,
    pub reference: String,
    pub timeline: Timeline,
    /// False when the history read failed and the timeline was built from
    /// whatever the order carried.
    pub history_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsHubView {
    pub pending: Vec<DeliveredMedicine>,
    pub reviews: Vec<Review>,
}
