pub mod lru;
pub mod simple_slotmap;
