//! Ordered list with a live preview of its first K elements.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TileError};
use crate::mirror::{ChangeHandler, CollectionChange, PrefixMirror};

/// A mutation command carrying its payload, as read from edit scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListEdit<T> {
    Push { item: T },
    Insert { index: usize, item: T },
    Move { from: usize, to: usize },
    Remove { index: usize },
    Replace { index: usize, item: T },
    Reset { items: Vec<T> },
    Clear,
}

impl<T> ListEdit<T> {
    /// Convert the payload while keeping the edit shape
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ListEdit<U> {
        match self {
            ListEdit::Push { item } => ListEdit::Push { item: f(item) },
            ListEdit::Insert { index, item } => ListEdit::Insert {
                index,
                item: f(item),
            },
            ListEdit::Move { from, to } => ListEdit::Move { from, to },
            ListEdit::Remove { index } => ListEdit::Remove { index },
            ListEdit::Replace { index, item } => ListEdit::Replace {
                index,
                item: f(item),
            },
            ListEdit::Reset { items } => ListEdit::Reset {
                items: items.into_iter().map(f).collect(),
            },
            ListEdit::Clear => ListEdit::Clear,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            ListEdit::Push { .. } => "push",
            ListEdit::Insert { .. } => "insert",
            ListEdit::Move { .. } => "move",
            ListEdit::Remove { .. } => "remove",
            ListEdit::Replace { .. } => "replace",
            ListEdit::Reset { .. } => "reset",
            ListEdit::Clear => "clear",
        }
    }
}

/// Owns the full ordered list and keeps a bound [`PrefixMirror`] of its head.
///
/// Every mutation validates its arguments before touching the list, so a
/// rejected call leaves both the list and the preview unchanged.
#[derive(Debug, Clone)]
pub struct PreviewedList<T> {
    items: Vec<T>,
    top: PrefixMirror<T>,
    last_change: Option<CollectionChange>,
}

impl<T: Clone> PreviewedList<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_items(capacity, Vec::new())
    }

    pub fn with_items(capacity: usize, items: Vec<T>) -> Result<Self> {
        let top = PrefixMirror::bound_to(capacity, &items)?;
        Ok(Self {
            items,
            top,
            last_change: None,
        })
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        let index = self.items.len();
        self.insert(index, item)
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.items.len() {
            return Err(TileError::out_of_bounds(
                "insert",
                "list",
                index,
                self.items.len(),
            ));
        }
        self.items.insert(index, item);
        self.notify(CollectionChange::Insert { index })
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index("remove", index)?;
        let removed = self.items.remove(index);
        self.notify(CollectionChange::Remove { index })?;
        Ok(removed)
    }

    /// Move an element; moving onto itself changes nothing and raises no
    /// notification.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index("move", from)?;
        self.check_index("move", to)?;
        if from == to {
            return Ok(());
        }
        let element = self.items.remove(from);
        self.items.insert(to, element);
        self.notify(CollectionChange::Move {
            old_index: from,
            new_index: to,
        })
    }

    pub fn replace(&mut self, index: usize, item: T) -> Result<T> {
        self.check_index("replace", index)?;
        let previous = std::mem::replace(&mut self.items[index], item);
        self.notify(CollectionChange::Replace { index })?;
        Ok(previous)
    }

    pub fn reset(&mut self, items: impl IntoIterator<Item = T>) -> Result<()> {
        self.items = items.into_iter().collect();
        self.notify(CollectionChange::Reset)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.notify(CollectionChange::Reset)
    }

    /// Apply one edit and return the notification it raised, if any
    pub fn apply_edit(&mut self, edit: ListEdit<T>) -> Result<Option<CollectionChange>> {
        self.last_change = None;
        let applied = match edit {
            ListEdit::Push { item } => self.push(item),
            ListEdit::Insert { index, item } => self.insert(index, item),
            ListEdit::Move { from, to } => self.move_item(from, to),
            ListEdit::Remove { index } => self.remove(index).map(|_| ()),
            ListEdit::Replace { index, item } => self.replace(index, item).map(|_| ()),
            ListEdit::Reset { items } => self.reset(items),
            ListEdit::Clear => self.clear(),
        };
        applied?;
        Ok(self.last_change)
    }

    fn notify(&mut self, change: CollectionChange) -> Result<()> {
        self.top.apply(&self.items, &change)?;
        self.last_change = Some(change);
        Ok(())
    }
}

impl<T> PreviewedList<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The first `capacity` items, maintained incrementally
    pub fn top_items(&self) -> &[T] {
        self.top.as_slice()
    }

    pub fn preview(&self) -> &PrefixMirror<T> {
        &self.top
    }

    pub fn capacity(&self) -> usize {
        self.top.capacity()
    }

    /// Most recent notification delivered to the preview
    pub fn last_change(&self) -> Option<&CollectionChange> {
        self.last_change.as_ref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn check_index(&self, action: &'static str, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(TileError::out_of_bounds(
                action,
                "list",
                index,
                self.items.len(),
            ))
        }
    }
}

impl<'a, T> IntoIterator for &'a PreviewedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
