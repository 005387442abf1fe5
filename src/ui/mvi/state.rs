/// Marker trait for UI state objects.
///
/// States are cloned rather than mutated in place, compared to detect
/// changes, and default to their closed/empty form.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
