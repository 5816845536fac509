pub mod cart;
pub mod medicine;
pub mod order;
pub mod profile;
pub mod review;
pub mod session;

pub use cart::{AddToCartPayload, Cart, CartItem, CartMedicine};
pub use medicine::{Medicine, MedicinePage, MedicineQuery};
pub use order::{CreateOrderPayload, Order, OrderItem, OrderStatus, OrderStatusHistory, OrderedMedicine};
pub use profile::{ChangePasswordPayload, ProfileData, UpdateProfilePayload};
pub use review::{
    CreateReviewPayload, CreatedReview, DeliveredMedicine, Review, ReviewList, ReviewMeta,
};
pub use session::{Role, SessionWithUser, User};
