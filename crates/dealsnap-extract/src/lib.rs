//! Heuristic extraction of deal fields from OCR text.
//!
//! Everything here is pure and synchronous: no I/O, no shared mutable state,
//! and no error paths. A field that cannot be found falls back to its empty
//! or zero value.

pub mod assemble;
pub mod date;
pub mod fields;

pub use assemble::assemble;
pub use date::{extract_expiration, find_expiration, ExpirationMatch, TWO_DIGIT_YEAR_PIVOT};
pub use fields::{extract_business_name, extract_price};
