//! QTG oracle abstraction.
//!
//! The variational loop talks to quantum hardware or a simulator only
//! through the [`Oracle`] trait, which evaluates expectation values and draws
//! measurement [`Counts`].
//!
//! | Oracle | Crate |
//! |--------|-------|
//! | Statevector simulator | `qtg-adapter-sim` |
//!
//! # Example
//!
//! ```rust
//! use qtg_hal::Counts;
//!
//! let counts = Counts::from_pairs([("100", 48), ("010", 27), ("000", 25)]);
//! if let Some((bitstring, count)) = counts.most_frequent() {
//!     assert_eq!(bitstring, "100");
//!     assert_eq!(count, 48);
//! }
//! ```

pub mod error;
pub mod oracle;
pub mod result;

pub use error::{HalError, HalResult};
pub use oracle::Oracle;
pub use result::Counts;
