//! Board topology: parsing, the tile matrix, the turn table, and
//! directions.

pub mod builder;
pub mod direction;
pub mod parser;
