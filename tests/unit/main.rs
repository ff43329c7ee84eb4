//! Unit test suite entry point.

mod engine_option_tests;
mod keyword_table_tests;
mod normalize_table_tests;
