//! Text-level scanning shared by the extractors
//!
//! Nothing here tokenizes Java; each helper recognises one surface shape
//! (a string literal chain, a constructor call, a list literal) at a known
//! offset and reports absence as `None` or an empty result.

pub mod calls;
pub mod lists;
pub mod literal;

pub use calls::{constructor_calls, is_identifier, parse_int, CallSite};
pub use lists::{find_list_literals, parse_list_expression};
pub use literal::{read_string, read_string_argument, ReadString};
