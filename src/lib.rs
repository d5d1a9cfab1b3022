pub mod analyzers;
pub mod cache;
pub mod classify;
pub mod config;
pub mod coords;
pub mod extract;
pub mod fetch;
pub mod infra;
pub mod loader;
pub mod output;
pub mod overrides;
pub mod parser;
pub mod resolve;
pub mod services;
pub mod visit;
