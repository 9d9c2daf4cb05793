//! pinrank-core
//!
//! Pin records, keyword matching, store traits, errors and configuration
//! shared by the store adapters and the resolver.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod matching;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{Identified, PinStore, PinWriter};
pub use types::{DocId, PinRecord, Position, SearchHit};
