//! Stats and numeric modifier aggregation

pub mod instance;
pub mod map;
pub mod modifier;

pub use instance::{aggregate, InstanceModifier, ModifiedInstance};
pub use map::StatMap;
pub use modifier::StatModifier;
