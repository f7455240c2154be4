//! Recordset - lazily evaluated, chainable record collections.
//!
//! A [`RecordSet`] is built by chaining filters, sort keys, and slices. No
//! data is fetched until the set is traversed, counted, or serialized; at
//! that point the accumulated query is pushed down to a [`Backend`] in one
//! call. Refining a set that is already materialized happens in memory and
//! produces a new, independent set.
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(feature = "memory")] {
//! use standout_recordset::{Attributes, MemoryBackend, RecordSet, Value};
//!
//! fn row(id: i64, priority: i64) -> Attributes {
//!     Attributes::from([
//!         ("id".to_string(), Value::from(id)),
//!         ("priority".to_string(), Value::from(priority)),
//!     ])
//! }
//!
//! let backend = MemoryBackend::new(vec![row(1, 3), row(2, 5), row(3, 1)]);
//!
//! // Nothing is fetched yet
//! let mut urgent = RecordSet::<Attributes, _>::with_backend(backend)
//!     .exclude_lt("priority", 3)?
//!     .sort_desc("priority");
//! assert!(!urgent.is_materialized());
//!
//! // Traversal materializes with a single backend query
//! let ids: Vec<_> = urgent.iter()?.map(|r| r["id"].clone()).collect();
//! assert_eq!(ids, vec![Value::from(2), Value::from(1)]);
//! # }
//! # Ok::<(), standout_recordset::RecordSetError>(())
//! ```
//!
//! # Operators
//!
//! | Fluent call | Pushed operator |
//! |-------------|-----------------|
//! | `filter_eq` / `exclude_eq` | `Eq` / `Ne` |
//! | `filter_in` / `exclude_in` | `In` / `NotIn` |
//! | `filter_gt` / `exclude_gt` | `Gt` / `Le` |
//! | `filter_lt` / `exclude_lt` | `Lt` / `Ge` |
//! | `filter_between` / `exclude_between` | `Between` / `NotBetween` |
//! | `filter_like` / `exclude_like` | `Like` / `NotLike` |
//!
//! # Features
//!
//! - `memory` (default): [`MemoryBackend`], an in-process backend.

mod condition;
mod error;
#[cfg(feature = "memory")]
mod memory;
mod op;
mod ordering;
mod query;
mod set;
mod traits;
mod value;

// Re-export public API
pub use condition::{like_to_regex, Condition, Conditions, Operand, ValueSet};
pub use error::{RecordSetError, Result};
#[cfg(feature = "memory")]
pub use memory::MemoryBackend;
pub use op::{Op, Shape};
pub use ordering::{compare_values, Dir, SortKey, SortKeys};
pub use query::{QuerySpec, Slice};
pub use set::RecordSet;
pub use traits::{Backend, Record};
pub use value::{Attributes, Number, Timestamp, Value};
