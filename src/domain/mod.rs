pub mod diagnostic;
pub mod product;
pub mod stats;
