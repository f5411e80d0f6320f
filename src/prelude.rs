//! Prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::dataset::{Float, LabelMap, LabeledSample, Records, Samples};

#[doc(no_inline)]
pub use crate::linalg::{dot, mul_t};

#[doc(no_inline)]
pub use crate::metrics_clustering::{ContingencyTable, EntropyReport};
