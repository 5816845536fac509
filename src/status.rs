//! Canonical status presentation: one table drives every badge, label and
//! timeline icon so the order list, order detail and tracking views agree.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatusIcon {
    CheckCircle,
    Package,
    Truck,
    Home,
    XCircle,
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMeta {
    pub code: &'static str,
    pub label: &'static str,
    pub badge: BadgeVariant,
    pub icon: StatusIcon,
}

static STATUS_TABLE: [StatusMeta; 6] = [
    StatusMeta {
        code: "PLACED",
        label: "Order Placed",
        badge: BadgeVariant::Secondary,
        icon: StatusIcon::CheckCircle,
    },
    StatusMeta {
        code: "CONFIRMS",
        label: "Confirmed",
        badge: BadgeVariant::Default,
        icon: StatusIcon::CheckCircle,
    },
    StatusMeta {
        code: "PROCESSING",
        label: "Processing",
        badge: BadgeVariant::Default,
        icon: StatusIcon::Package,
    },
    StatusMeta {
        code: "SHIPPED",
        label: "Shipped",
        badge: BadgeVariant::Outline,
        icon: StatusIcon::Truck,
    },
    StatusMeta {
        code: "DELIVERED",
        label: "Delivered",
        badge: BadgeVariant::Default,
        icon: StatusIcon::Home,
    },
    StatusMeta {
        code: "CANCELLED",
        label: "Cancelled",
        badge: BadgeVariant::Destructive,
        icon: StatusIcon::XCircle,
    },
];

pub fn lookup(status: &OrderStatus) -> Option<&'static StatusMeta> {
    STATUS_TABLE.iter().find(|meta| meta.code == status.as_str())
}

/// Render-ready status: unknown values fall back to the raw string.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub code: String,
    pub label: String,
    pub badge: BadgeVariant,
    pub icon: StatusIcon,
}

impl StatusView {
    pub fn of(status: &OrderStatus) -> Self {
        match lookup(status) {
            Some(meta) => Self {
                code: meta.code.to_string(),
                label: meta.label.to_string(),
                badge: meta.badge,
                icon: meta.icon,
            },
            None => Self {
                code: status.as_str().to_string(),
                label: status.as_str().to_string(),
                badge: BadgeVariant::Secondary,
                icon: StatusIcon::Clock,
            },
        }
    }
}
