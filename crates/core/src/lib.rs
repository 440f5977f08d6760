pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod service;
pub mod store;

pub use domain::order::{LineRequest, Order, OrderDraft, OrderId, OrderItem, OrderRequest};
pub use domain::product::{NewProduct, Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError, StoreError, ValidationError};
pub use pricing::QuantityPolicy;
pub use service::{CatalogService, OrderService};
pub use store::{CatalogStore, OrderStore, PageRequest};
