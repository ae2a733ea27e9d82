pub mod events;
pub mod sleep;
pub mod statistics;
pub mod trends;
