//! Integration test suite entry point.

mod catalog_refresh_tests;
mod embedding_service_tests;
mod engine_tests;
mod sqlite_store_tests;
