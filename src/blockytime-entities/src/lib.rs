//! `SeaORM` entities for the block store.

pub mod prelude;

pub mod block;
pub mod type_;
