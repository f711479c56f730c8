pub mod errors;
pub mod models;
pub mod pipeline;
pub mod ports;
pub mod service;
