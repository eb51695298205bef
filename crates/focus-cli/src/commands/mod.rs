pub mod config;
pub mod plan;
pub mod routine;
pub mod session;
