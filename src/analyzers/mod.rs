//! Fleet statistics derived from the stored vehicle records.
//!
//! Every analyzer reads the store's current contents and builds its result
//! from scratch; nothing is cached between calls.

pub mod bearing;
pub mod routes;
pub mod summary;
pub mod types;
pub mod utility;
