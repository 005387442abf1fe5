//! Model-View-Intent (MVI) primitives.
//!
//! Dialogs that edit state before applying it are modelled as a pure
//! reducer over an immutable state, driven by intents.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
