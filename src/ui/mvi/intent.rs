/// Marker trait for intent objects.
///
/// Intents are user actions (toggling a checkbox, pressing Apply) or
/// system events that a reducer turns into a new state.
pub trait Intent: Send + 'static {}
