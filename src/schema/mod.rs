//! Column normalization
//!
//! Source vintages disagree on column names, units and missingness. This
//! module maps whatever headers the source carries onto the canonical
//! field set ([`aliases`]) and coerces raw cells into typed values,
//! correcting distance units per chunk ([`normalize`]). Nothing here
//! drops rows or raises on bad data; defects become null fields for the
//! validator to judge.

pub mod aliases;
pub mod normalize;

pub use aliases::ColumnMap;
pub use normalize::{MILES_TO_KM, normalize_chunk};
