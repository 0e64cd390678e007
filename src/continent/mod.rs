//! Continent data module
//!
//! Holds the fixed continent data set served by the lookup handler:
//! - `ContinentRecord`: display name, area and population of one continent
//! - `ContinentTable`: immutable key to record mapping built once at startup
//! - `ContinentError`: lookup and path extraction failures

mod error;
mod record;
mod table;

pub use error::ContinentError;
pub use table::ContinentTable;
