pub mod action_item;
pub mod language;

pub use action_item::*;
pub use language::*;
