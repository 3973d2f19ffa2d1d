//! Expiring key-value stores.
//!
//! Every entry carries an absolute expiry time taken from a [`Clock`].
//! Reading a key strictly after its expiry returns nothing and evicts the
//! entry. [`MemoryCache`] lives for the process; [`FileCache`] keeps its
//! entries in a JSON file.

mod clock;
mod error;
mod file;
mod memory;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, Result};
pub use file::FileCache;
pub use memory::MemoryCache;
pub use store::{Cache, CacheExt, Entry};
