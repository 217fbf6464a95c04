pub mod config;
pub mod constants;
pub mod extent;
pub mod geo;
pub mod view;
