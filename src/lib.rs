pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod mapper;
pub mod normalizer;
pub mod output;
pub mod runner;

#[cfg(test)]
mod tests;
