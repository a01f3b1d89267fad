pub mod auth_tests;
pub mod common;
