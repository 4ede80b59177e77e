pub mod analyze;
pub mod config;
pub mod domains;
pub mod rules;
pub mod scan;
