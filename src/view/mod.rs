pub mod filter;
pub mod rows;

pub use filter::{filter, StatusFilter};
pub use rows::{detail_lines, rows};
