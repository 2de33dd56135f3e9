pub mod build;
pub mod check;
pub mod download;
pub mod plan;
