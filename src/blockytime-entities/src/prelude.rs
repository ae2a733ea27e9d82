pub use super::block::Entity as Block;
pub use super::type_::Entity as Type;
