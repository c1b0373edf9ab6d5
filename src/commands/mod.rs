pub mod act;
pub mod capture;
pub mod offline;
pub mod tag;
pub mod utils;

#[cfg(test)]
#[path = "../commands_test.rs"]
mod commands_test;
