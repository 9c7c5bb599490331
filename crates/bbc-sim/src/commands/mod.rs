pub mod distance;
pub mod search;
pub mod summary;
