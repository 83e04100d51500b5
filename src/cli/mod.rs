//! Terminal output helpers for the operator CLI.

pub mod outputformatter;

pub use outputformatter::{print_record, print_records};
