pub mod catalog;
pub mod metadata;
pub mod ratings;
pub mod recommendation;
