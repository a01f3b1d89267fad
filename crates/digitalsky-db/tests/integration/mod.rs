pub mod application_tests;
pub mod common;
