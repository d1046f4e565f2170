//! Pure transforms over fetched data: series repair, derived metrics and
//! domain inference. Nothing here performs I/O.

pub mod domain;
pub mod metrics;
pub mod series;
