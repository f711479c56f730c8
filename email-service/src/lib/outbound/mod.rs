pub mod inference;
pub mod repositories;
