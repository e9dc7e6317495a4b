//! cz-core: stable foundation for coldzone.
//!
//! Contains:
//! - zone (closed zone set + fixed per-zone storage)
//! - units (uom SI types + constructors)
//! - numeric (finiteness checks + fixed-precision rounding)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;
pub mod zone;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
pub use zone::{Zone, ZoneMap};
