pub mod order;

pub use order::{Channel, OrderStatus, PaymentMethod};
