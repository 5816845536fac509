//! Cart-to-order transition: the checkout form and the view shown before it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Cart, CartItem, CreateOrderPayload};
use crate::validation::{validate_mobile_number, FieldErrors};

/// Shipping details typed by the shopper.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub shipping_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_mobile_number"))]
    pub shipping_phone: String,
    #[serde(default)]
    #[validate(length(
        min = 100,
        max = 500,
        message = "Address must be between 100 and 500 characters (write in detail)"
    ))]
    pub shipping_address: String,
}

impl CheckoutForm {
    fn trimmed(self) -> Self {
        Self {
            shipping_name: self.shipping_name.trim().to_string(),
            shipping_phone: self.shipping_phone.trim().to_string(),
            shipping_address: self.shipping_address.trim().to_string(),
        }
    }

    /// Validates the trimmed form; nothing reaches the backend on failure.
    pub fn into_payload(self) -> Result<CreateOrderPayload, FieldErrors> {
        let form = self.trimmed();
        form.validate().map_err(FieldErrors::from)?;
        Ok(CreateOrderPayload {
            shipping_name: form.shipping_name,
            shipping_phone: form.shipping_phone,
            shipping_address: form.shipping_address,
        })
    }
}

/// What the checkout page renders for a non-empty cart.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub item_count: u32,
    pub payment_method: String,
}

impl CheckoutView {
    /// `None` for an empty cart: the page redirects instead of rendering.
    pub fn for_cart(cart: Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }
        Some(Self {
            item_count: cart.cart_count,
            subtotal: cart.subtotal,
            items: cart.items,
            payment_method: "Cash on delivery".to_string(),
        })
    }
}
