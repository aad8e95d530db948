//! Shared traits and identifiers for accounting entities.

use rust_decimal::Decimal;

/// Server-assigned primary key.
pub type EntityId = i64;

/// Exposes the server identifier of an entity, when it has been persisted.
pub trait Identifiable {
    fn id(&self) -> Option<EntityId>;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Sums the amounts of a slice of entities.
pub fn total_of<T: Amounted>(items: &[T]) -> Decimal {
    items.iter().map(Amounted::amount).sum()
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn default_true() -> bool {
    true
}
