mod product;
mod specs;

pub use product::{Dataset, ProductRecord, NOT_AVAILABLE};
pub use specs::Specification;
