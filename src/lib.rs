pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod ranking;
pub mod render;
pub mod report;
pub mod stats;
pub mod tally;
