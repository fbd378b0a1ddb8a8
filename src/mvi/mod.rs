//! Model-View-Intent (MVI) primitives.
//!
//! Store state only changes through a reducer, which keeps every
//! transition of a synchronization store a pure, testable function.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable representation of a store's cached data
//! - **Intent**: Store actions and service responses
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::StoreState;
