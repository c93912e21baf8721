//! Stateless repository functions over `&Connection`.
//!
//! Repositories own the SQL and the row mapping, nothing else. Pooling,
//! change notification, and business rules live in the store layer above.

pub mod context;
