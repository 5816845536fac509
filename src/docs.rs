use crate::{
    cancellation::CancelRequest,
    checkout::{CheckoutForm, CheckoutView},
    error::ErrorResponse,
    models::{
        AddToCartPayload, Cart, CartItem, CartMedicine, CreatedReview, DeliveredMedicine, Medicine,
        MedicinePage, Order, OrderItem, OrderStatusHistory, OrderedMedicine, ProfileData, Review,
        ReviewList, ReviewMeta, User,
    },
    models::medicine::{CategoryRef, SellerRef},
    models::review::{ReviewedMedicine, Reviewer},
    profile::{PasswordForm, PasswordStrength, ProfileForm},
    reviews::ReviewForm,
    routes::{health::Health, ActionResult},
    session::{NavRoute, SessionView},
    status::{BadgeVariant, StatusIcon, StatusView},
    tracking::{StepState, Timeline, TimelineStep},
    views::{OrderDetailView, OrderLineView, OrderSummaryView, ReviewsHubView, TrackingView},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::health::current_session,
        crate::routes::shop::list_medicines,
        crate::routes::shop::get_medicine,
        crate::routes::shop::medicine_reviews,
        crate::routes::cart::get_cart,
        crate::routes::cart::add_to_cart,
        crate::routes::cart::checkout_page,
        crate::routes::cart::place_order,
        crate::routes::orders::list_orders,
        crate::routes::orders::get_order,
        crate::routes::orders::track_order,
        crate::routes::orders::cancel_order,
        crate::routes::profile::get_profile,
        crate::routes::profile::update_profile,
        crate::routes::profile::change_password,
        crate::routes::reviews::reviews_hub,
        crate::routes::reviews::create_review,
        crate::routes::reviews::delete_review
    ),
    components(schemas(
        Health,
        ActionResult,
        ErrorResponse,
        SessionView,
        NavRoute,
        User,
        Medicine,
        MedicinePage,
        CategoryRef,
        SellerRef,
        Cart,
        CartItem,
        CartMedicine,
        AddToCartPayload,
        CheckoutForm,
        CheckoutView,
        Order,
        OrderItem,
        OrderedMedicine,
        OrderStatusHistory,
        OrderSummaryView,
        OrderDetailView,
        OrderLineView,
        TrackingView,
        Timeline,
        TimelineStep,
        StepState,
        StatusView,
        BadgeVariant,
        StatusIcon,
        CancelRequest,
        ProfileData,
        ProfileForm,
        PasswordForm,
        PasswordStrength,
        Review,
        Reviewer,
        ReviewedMedicine,
        ReviewList,
        ReviewMeta,
        CreatedReview,
        DeliveredMedicine,
        ReviewForm,
        ReviewsHubView
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Session", description = "Signed-in user and role navigation"),
        (name = "Shop", description = "Catalogue browsing"),
        (name = "Cart", description = "Cart contents"),
        (name = "Checkout", description = "Cart to order transition"),
        (name = "Orders", description = "Order history, tracking and cancellation"),
        (name = "Profile", description = "Profile and password"),
        (name = "Reviews", description = "Medicine reviews")
    ),
    info(
        title = "MediStore Storefront API",
        version = "0.1.0",
        description = "Storefront views over the MediStore REST API.\n\n## Sessions\n\nThe browser's session cookie is forwarded to the backend untouched. Reads are cached per session for a short time; a successful mutation drops the views it affects.\n\n## Errors\n\nField-level validation failures return `422` with `fields`. Backend rejections keep the backend's status and message."
    )
)]
pub struct ApiDoc;
