//! Domain models
//!
//! Plain serde structs shared between the server and its clients. Database
//! row mapping (`sqlx::FromRow`) is gated behind the `db` feature so that
//! non-server consumers don't pull in sqlx.

pub mod category;
pub mod dining_table;
pub mod event;
pub mod order;
pub mod product;
pub mod restaurant;
pub mod service_call;
pub mod session;

pub use category::{Category, CategoryCreate};
pub use dining_table::{DiningTable, TableBatchCreate, TableCreate, TableUpdate};
pub use event::{DomainEvent, DomainEventType};
pub use order::{
    Order, OrderItem, OrderItemInput, OrderItemsRequest, OrderStatus, OrderItemStatus,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use restaurant::{Restaurant, RestaurantCreate};
pub use service_call::{CallStatus, CallType, ServiceCall, ServiceCallCreate};
pub use session::{
    Consumer, ConsumerAdd, Session, SessionStatus, SessionStatusUpdate, StartSession,
};
