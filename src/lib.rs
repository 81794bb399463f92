pub mod backends;
pub mod cli;
pub mod color;
pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod scan;
pub mod theme;
