//! Quest helper source text and member-body location

pub mod locator;
pub mod unit;

pub use locator::locate;
pub use unit::{MemberSpan, SourceUnit};
