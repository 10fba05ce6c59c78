//! Generator for a multi-sheet cost calculator workbook.
//!
//! The cost model lives in [`schema`] as declarative tables. [`layout`] turns
//! those tables into cells at fixed addresses and resolves the symbolic
//! references inside formula templates, [`io`] writes the result with
//! `rust_xlsxwriter` and reads it back with `calamine`, and [`verify`] compares
//! the two. [`generate`] strings the steps together for the command line.

pub mod error;
pub mod generate;
pub mod io;
pub mod layout;
pub mod model;
pub mod schema;
pub mod verify;

pub use error::{CalculatorError, Result};
