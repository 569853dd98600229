/// Outcome of offering a key to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, parent should react to the event
  Event(T),
  /// Not consumed, parent should try the next handler
  NotHandled,
}
