pub mod entity;
pub mod error;
pub mod repository;
pub mod seed;
pub mod slot;

pub use error::StoreError;
pub use slot::FileSlot;
