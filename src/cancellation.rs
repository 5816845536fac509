//! Client-side cancellation gate. The backend re-checks every cancellation;
//! this only decides whether to offer the action and refuses obvious misuse.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::OrderStatus;

/// Only freshly placed orders may be cancelled by the shopper.
pub fn can_cancel(status: &OrderStatus) -> bool {
    *status == OrderStatus::Placed
}

/// Body of the cancel request; `confirm` must be set by an explicit dialog.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CancelRequest {
    #[serde(default)]
    pub confirm: bool,
}

pub fn require_confirmation(request: &CancelRequest) -> Result<(), ApiError> {
    if request.confirm {
        Ok(())
    } else {
        Err(ApiError::ConfirmationRequired)
    }
}

pub fn ensure_cancellable(status: &OrderStatus) -> Result<(), ApiError> {
    if can_cancel(status) {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!(
            "Order can no longer be cancelled (status {status})"
        )))
    }
}
