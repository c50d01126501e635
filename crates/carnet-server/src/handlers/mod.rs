//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod assistant;
pub mod budgets;
pub mod classifier;
pub mod export;
pub mod objectives;
pub mod preferences;
pub mod transactions;

// Re-export all handlers for use in router
pub use assistant::*;
pub use budgets::*;
pub use classifier::*;
pub use export::*;
pub use objectives::*;
pub use preferences::*;
pub use transactions::*;
