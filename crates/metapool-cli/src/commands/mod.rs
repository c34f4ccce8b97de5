pub mod index;
pub mod normalize;
pub mod pool;
pub mod reformat;
