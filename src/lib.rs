pub mod cli;
pub mod config;
pub mod directives;
pub mod discovery;
pub mod host;
pub mod model;
pub mod resolver;
