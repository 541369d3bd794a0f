pub mod config;
pub mod directives;
pub mod exports;
pub mod sections;
