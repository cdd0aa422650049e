// Pokedex Arena Schema - Shared type definitions
// This crate holds the catalog data types shared between the main
// pokedex-arena crate and its build script, so the bundled catalog can be
// compiled to postcard at build time and decoded at runtime.

pub use creature_data::*;
pub use creature_types::*;

pub mod creature_data;
pub mod creature_types;
