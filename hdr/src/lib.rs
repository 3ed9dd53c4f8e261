// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! High dynamic range histograms with logarithmic buckets.
//!
//! Values are counted in buckets which double in width, each split into a
//! fixed number of linear sub-buckets, so the relative error of any reported
//! value is bounded by the configured number of significant figures. The
//! recorded distribution is read back through traversals (see [`iter`]),
//! which step over the counters and report running totals and percentiles.
//!
//! ```
//! use hdr::Histogram;
//!
//! let mut histogram = Histogram::new(1, 3_600_000_000, 3).unwrap();
//! for value in 1..=1000 {
//!     histogram.record(value).unwrap();
//! }
//!
//! assert_eq!(histogram.value_at_percentile(50.0), Ok(500));
//!
//! for step in histogram.iter_percentiles(5).unwrap() {
//!     println!(
//!         "{:>8} {:>10.4}",
//!         step.value_iterated_to(),
//!         step.percentile_level_iterated_to()
//!     );
//! }
//! ```

mod atomic;
mod builder;
mod config;
mod errors;
mod parameters;
mod standard;

pub mod iter;

pub use atomic::AtomicHistogram;
pub use builder::{Builder, Overflow};
pub use config::Config;
pub use errors::{Error, WithCode};
pub use iter::{AllValues, Iter, IterationValue, Percentiles, Policy, Recorded, State};
pub use parameters::Parameters;
pub use standard::Histogram;
