pub mod dimensions;
pub mod flatten;
pub mod resize;
pub mod tier;
