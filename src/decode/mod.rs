//! Response deserialization module
//!
//! # Overview
//!
//! The decode module turns raw response text into JSON trees or typed values.
//! Custom conversion rules ([`JsonConverter`]) can rewrite individual fields
//! of the tree before the typed conversion runs, e.g. to normalize the
//! `Wed Aug 27 13:08:45 +0000 2008` date format into RFC 3339.

pub mod dates;
mod decoders;
mod types;

pub use decoders::{JsonDeserializer, TwitterDateConverter};
pub use types::{ConverterSet, JsonConverter};
