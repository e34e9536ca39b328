pub mod app;
pub mod cli;
pub mod config;
pub mod detector;
pub mod gate;
pub mod importer;
pub mod output;
pub mod record;
pub mod schema;
pub mod store;
pub mod utils;
pub mod validator;
pub mod view;

#[cfg(test)]
mod tests;
