//! Property test suite entry point.

mod fusion_properties;
mod vector_properties;
