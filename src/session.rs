use axum::{extract::FromRequestParts, http::header::COOKIE, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{Role, User};
use crate::state::AppState;

/// The caller's session as seen by this server: the raw `Cookie` header to
/// forward upstream and the session token used to scope cached views.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub cookie: Option<String>,
    pub scope: Option<String>,
}

impl Session {
    pub fn from_parts(parts: &Parts, cookie_name: &str) -> Self {
        let cookie = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let scope = CookieJar::from_headers(&parts.headers)
            .get(cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());
        Self { cookie, scope }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Mutations are refused outright without a session cookie.
    pub fn require_scope(&self) -> Result<&str, ApiError> {
        self.scope.as_deref().ok_or(ApiError::Unauthorized)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Session::from_parts(parts, &state.session_cookie))
    }
}

/// The signed-in user, resolved once per request through the backend.
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_parts(parts, &state.session_cookie);
        match state.backend.current_user(session.cookie()).await? {
            Some(user) => Ok(CurrentUser { user, session }),
            None => {
                warn!("request to {} without a valid session", parts.uri.path());
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavRoute {
    #[schema(value_type = String)]
    pub title: &'static str,
    #[schema(value_type = String)]
    pub url: &'static str,
}

const fn route(title: &'static str, url: &'static str) -> NavRoute {
    NavRoute { title, url }
}

const BASE_ROUTES: &[NavRoute] = &[route("Shop", "/shop")];

const CUSTOMER_ROUTES: &[NavRoute] = &[
    route("Cart", "/cart"),
    route("Orders", "/orders"),
    route("Dashboard", "/dashboard"),
];

const SELLER_ROUTES: &[NavRoute] = &[
    route("Medicine", "/seller/medicine"),
    route("Orders", "/seller/orders"),
    route("Dashboard", "/seller/dashboard"),
];

const ADMIN_ROUTES: &[NavRoute] = &[
    route("user", "/admin/user"),
    route("Orders", "/admin/orders"),
    route("Categories", "/admin/categories"),
    route("Dashboard", "/dashboard"),
];

impl Role {
    /// Routes specific to this role; unknown roles get none.
    pub fn routes(&self) -> &'static [NavRoute] {
        match self {
            Role::Customer => CUSTOMER_ROUTES,
            Role::Seller => SELLER_ROUTES,
            Role::Admin => ADMIN_ROUTES,
            Role::Other(_) => &[],
        }
    }
}

/// Full menu for a visitor: base routes, then role routes when signed in.
pub fn navigation(role: Option<&Role>) -> Vec<NavRoute> {
    let mut menu = BASE_ROUTES.to_vec();
    if let Some(role) = role {
        menu.extend_from_slice(role.routes());
    }
    menu
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub authenticated: bool,
    pub user: Option<User>,
    pub navigation: Vec<NavRoute>,
}

impl SessionView {
    pub fn for_user(user: Option<User>) -> Self {
        Self {
            authenticated: user.is_some(),
            navigation: navigation(user.as_ref().map(|user| &user.role)),
            user,
        }
    }
}
