//! Built-in compilation passes.

pub mod analysis;
pub mod cancel;
pub mod lower;

pub use analysis::GateCounts;
pub use cancel::CancelInverses;
pub use lower::{LowerToPrimitives, lower_comparator, lower_mcx_vchain};
