//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, construct a new one. Constructors are expected to enforce
/// the object's invariants so that any instance in hand is valid.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
