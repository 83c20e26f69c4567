//! Declared-order sorting for nested collections
//!
//! Demos, blog images and the tool text lists (features, pros, cons, usage
//! steps) carry an explicit display order. Output lists are sorted by that
//! order, then by creation time, then by id so client rendering is
//! deterministic even when two rows share both values.

use chrono::{DateTime, Utc};

/// A nested record with an explicit display position
pub trait DeclaredOrder {
    fn declared_order(&self) -> i64;
    fn created_at(&self) -> DateTime<Utc>;
    fn id(&self) -> i64;
}

/// Sort `items` ascending by (declared order, creation time, id)
pub fn sort_by_declared_order<T: DeclaredOrder>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.declared_order()
            .cmp(&b.declared_order())
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.id().cmp(&b.id()))
    });
}
