#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Closed-set code unit serializer.
//!
//! Encodes every builtin and bytecode handler into one blob with a trailing
//! offset table. References out of a unit body are resolved as roots,
//! self-references to other units, or entries of the shared snapshot cache.

mod builtin;
mod cache;
mod invariants;
mod object;
mod resolver;
mod roots;
mod sink;
mod startup;
mod stats;

#[cfg(test)]
mod resolver_tests;
#[cfg(test)]
mod test_utils;

pub use builtin::{BuiltinSerializer, BuiltinSnapshot};
pub use cache::{PartialSnapshotCache, SnapshotCache};
pub use object::{BodySerializer, ObjectSerializer};
pub use resolver::{Reference, ReferenceEncoder, ReferenceResolver, ReferenceSite};
pub use roots::{RootIndexMap, RootTable};
pub use sink::SnapshotSink;
pub use startup::{CacheSnapshot, serialize_cache_section};
pub use stats::{ReferenceCounts, SerializerStats};
