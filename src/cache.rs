//! Short-lived per-session view cache plus the table that decides which
//! cached views a successful mutation makes stale.

use dashmap::{mapref::entry::Entry, DashMap};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Cart,
    Orders,
    Order(String),
    OrderHistory(String),
    UserReviews,
    DeliveredMedicines,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddToCart,
    CreateOrder,
    CancelOrder { order_id: String },
    CreateReview { medicine_id: String },
    DeleteReview { review_id: String },
    UpdateProfile,
    ChangePassword,
}

impl Mutation {
    /// Stable name, used for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Mutation::AddToCart => "add_to_cart",
            Mutation::CreateOrder => "create_order",
            Mutation::CancelOrder { .. } => "cancel_order",
            Mutation::CreateReview { .. } => "create_review",
            Mutation::DeleteReview { .. } => "delete_review",
            Mutation::UpdateProfile => "update_profile",
            Mutation::ChangePassword => "change_password",
        }
    }

    /// In-flight guard key: the action plus the record it targets, so
    /// cancelling two different orders never collides.
    pub fn guard_key(&self) -> String {
        match self {
            Mutation::CancelOrder { order_id } => format!("cancel_order:{order_id}"),
            Mutation::CreateReview { medicine_id } => format!("create_review:{medicine_id}"),
            Mutation::DeleteReview { review_id } => format!("delete_review:{review_id}"),
            other => other.action().to_string(),
        }
    }

    /// Views made stale by this mutation succeeding.
    pub fn invalidates(&self) -> Vec<ViewKey> {
        match self {
            Mutation::AddToCart => vec![ViewKey::Cart],
            Mutation::CreateOrder => vec![ViewKey::Cart, ViewKey::Orders],
            Mutation::CancelOrder { order_id } => vec![
                ViewKey::Orders,
                ViewKey::Order(order_id.clone()),
                ViewKey::OrderHistory(order_id.clone()),
            ],
            Mutation::CreateReview { .. } | Mutation::DeleteReview { .. } => {
                vec![ViewKey::UserReviews, ViewKey::DeliveredMedicines]
            }
            Mutation::UpdateProfile | Mutation::ChangePassword => vec![ViewKey::Profile],
        }
    }
}

/// A cached view, or a marker left by `invalidate` (`value: None`) so that a
/// load which began before the mutation cannot store its result afterwards.
struct CachedView {
    stored_at: Instant,
    value: Option<Value>,
}

/// Views are scoped by session so one shopper never sees another's cart.
pub struct ViewCache {
    entries: DashMap<(String, ViewKey), CachedView>,
    ttl: Duration,
}

impl ViewCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, scope: &str, key: &ViewKey) -> Option<T> {
        let cache_key = (scope.to_string(), key.clone());
        let value = {
            let entry = self.entries.get(&cache_key)?;
            if entry.stored_at.elapsed() >= self.ttl {
                None
            } else {
                Some(entry.value.clone())
            }
        };

        match value {
            Some(value) => serde_json::from_value(value?).ok(),
            None => {
                self.entries.remove(&cache_key);
                None
            }
        }
    }

    /// Stores a view loaded since `loaded_since`. The write is dropped when
    /// the view was invalidated or replaced after the load began, or when it
    /// is already older than the TTL.
    pub fn put<T: Serialize>(&self, scope: &str, key: ViewKey, view: &T, loaded_since: Instant) {
        if self.ttl.is_zero() || loaded_since.elapsed() >= self.ttl {
            return;
        }
        self.cleanup();

        let value = match serde_json::to_value(view) {
            Ok(value) => value,
            Err(err) => {
                warn!("view {key:?} not cached: {err}");
                return;
            }
        };
        let fresh = CachedView {
            stored_at: Instant::now(),
            value: Some(value),
        };

        match self.entries.entry((scope.to_string(), key)) {
            Entry::Occupied(entry) if entry.get().stored_at >= loaded_since => {
                debug!("view {:?} changed while loading; not cached", entry.key().1);
            }
            Entry::Occupied(mut entry) => {
                entry.insert(fresh);
            }
            Entry::Vacant(entry) => {
                entry.insert(fresh);
            }
        }
    }

    /// Drops every view the mutation affects; returns how many were cached.
    pub fn invalidate(&self, scope: &str, mutation: &Mutation) -> usize {
        if self.ttl.is_zero() {
            return 0;
        }
        self.cleanup();

        let removed = mutation
            .invalidates()
            .into_iter()
            .filter_map(|key| {
                self.entries.insert(
                    (scope.to_string(), key),
                    CachedView {
                        stored_at: Instant::now(),
                        value: None,
                    },
                )
            })
            .filter(|previous| previous.value.is_some())
            .count();
        debug!(
            "{} invalidated {removed} cached view(s)",
            mutation.action()
        );
        removed
    }

    /// Evicts every view and marker older than the TTL.
    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
