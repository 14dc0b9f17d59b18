pub mod analyzers;
pub mod archive;
pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod stats;
