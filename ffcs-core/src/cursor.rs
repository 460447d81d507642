//! A chainable view over one already-fetched page of results.
//!
//! The remote service returns listings as a single JSON array, so nothing
//! here is lazy with respect to the network. What is lazy is the read index:
//! `sort`, `skip_items` and `limit_items` reshape the working copy in the
//! order they are called, and iteration walks it without consuming it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    normalize::{Record, deserialize_known_fields, restore_known_identifiers},
    value::{Document, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl TryFrom<i32> for SortDirection {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Self::Ascending),
            -1 => Ok(Self::Descending),
            other => Err(Error::format("direction", &other.to_string(), "1 or -1")),
        }
    }
}

/// Anything a cursor can sort by field name.
pub trait Keyed {
    /// The value stored under `key`, or [`Value::Null`] when absent.
    fn key_value(&self, key: &str) -> Value;
}

impl Keyed for Document {
    fn key_value(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }
}

/// Reads `key` off a typed record by way of its wire form, restoring the
/// timestamp or identifier typing the record declares for it.
pub fn record_key_value<T: Record + Serialize>(record: &T, key: &str) -> Value {
    let Ok(serde_json::Value::Object(mut map)) = serde_json::to_value(record) else {
        return Value::Null;
    };
    let Some(raw) = map.remove(key) else {
        return Value::Null;
    };

    let mut single = Document::from([(key.to_string(), Value::from(raw))]);
    let typed = deserialize_known_fields(&mut single, T::TIMESTAMP_FIELDS)
        .and_then(|()| restore_known_identifiers(&mut single, T::IDENTIFIER_FIELDS));

    match typed {
        Ok(()) => single.remove(key).unwrap_or_default(),
        Err(_) => Value::Null,
    }
}

/// Implements [`Keyed`] for typed records via [`record_key_value`].
#[macro_export]
macro_rules! keyed_record {
    ($($record:ty),+ $(,)?) => {
        $(
            impl $crate::cursor::Keyed for $record {
                fn key_value(&self, key: &str) -> $crate::value::Value {
                    $crate::cursor::record_key_value(self, key)
                }
            }
        )+
    };
}

#[derive(Debug, Clone)]
pub struct Cursor<T> {
    original: Vec<T>,
    working: Vec<T>,
    index: usize,
}

impl<T: Clone> Cursor<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            working: items.clone(),
            original: items,
            index: 0,
        }
    }

    pub fn skip_items(&mut self, n: usize) -> &mut Self {
        let n = n.min(self.working.len());
        self.working.drain(..n);

        self
    }

    pub fn limit_items(&mut self, n: usize) -> &mut Self {
        self.working.truncate(n);

        self
    }

    /// Moves the read index back to the start without undoing any reshaping.
    pub fn rewind(&mut self) -> &mut Self {
        self.index = 0;

        self
    }

    /// With `with_limit_and_skip` the size of the reshaped view, otherwise the
    /// size of the page as fetched.
    #[must_use]
    pub fn item_count(&self, with_limit_and_skip: bool) -> usize {
        if with_limit_and_skip {
            self.working.len()
        } else {
            self.original.len()
        }
    }

    pub fn close(&mut self) {
        self.working.clear();
        self.index = 0;
    }

    #[must_use]
    pub fn alive(&self) -> bool {
        self.index < self.working.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn original(&self) -> &[T] {
        &self.original
    }
}

impl<T: Clone + Keyed> Cursor<T> {
    /// Stable sort of the working copy. Missing keys sort as null.
    pub fn sort(&mut self, key: &str, direction: SortDirection) -> &mut Self {
        let mut decorated: Vec<(Value, T)> = self
            .working
            .drain(..)
            .map(|item| (item.key_value(key), item))
            .collect();

        decorated.sort_by(|(a, _), (b, _)| {
            let ordering: Ordering = a.compare(b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        self.working = decorated.into_iter().map(|(_, item)| item).collect();

        self
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.working.get(self.index).cloned()?;
        self.index += 1;

        Some(item)
    }
}
