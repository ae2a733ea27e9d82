#[macro_use]
extern crate log;

mod db;
pub use db::DatabaseHandler;

mod cache;
pub use cache::QueryCache;

mod algo_impl;
mod type_impl;

pub use type_impl::events::SearchEvents;
