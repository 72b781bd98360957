//! Builder API for assembling definition specs in code.
//!
//! Builders produce a [`DefinitionSpec`](crate::core::DefinitionSpec), the
//! same shape a caller would deserialize from a request body. They check
//! that each state and action is well formed; graph rules such as the single
//! initial state stay with the validator.
//!
//! # Example
//!
//! ```
//! use waypoint::builder::{ActionBuilder, DefinitionBuilder, StateBuilder};
//!
//! let spec = DefinitionBuilder::new("Ticket")
//!     .state(StateBuilder::new("open", "Open").initial())
//!     .state(StateBuilder::new("closed", "Closed").terminal())
//!     .action(ActionBuilder::new("close", "Close").from("open").to("closed"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(spec.states.len(), 2);
//! ```

pub mod action;
pub mod definition;
pub mod error;
pub mod state;

pub use action::ActionBuilder;
pub use definition::DefinitionBuilder;
pub use error::BuildError;
pub use state::StateBuilder;
