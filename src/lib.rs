pub mod aggregate;
pub mod assets;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod health;
pub mod loader;
pub mod report;
pub mod scan;
pub mod table;
pub mod util;
