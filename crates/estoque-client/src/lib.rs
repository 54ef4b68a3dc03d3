pub mod client;
pub mod mock;

pub use client::{HttpStore, StoreClient, StoreConfig};
pub use mock::{MockStore, StoreOp};
