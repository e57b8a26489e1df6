//! Bounded prefix mirror: a capacity-limited copy of the first K elements of a
//! larger ordered collection, kept in step one change notification at a time.
//!
//! # Model
//!
//! ```text
//!   source:  [ a  b  c  d  e  f  g ... ]
//!             └──── K ────┘
//!   mirror:  [ a  b  c  d ]
//! ```
//!
//! After every applied [`CollectionChange`] the mirror equals
//! `source[..min(K, source.len())]`. Each handler does at most O(K) work and
//! reads the *live* source (already mutated) through [`SourceView`], so the
//! mirror never caches elements the source no longer holds.
//!
//! Tracked positions are `0..K`. Removing from (or moving out of) the window
//! backfills the last slot from `source[K - 1]` when the source is long
//! enough; otherwise the mirror shrinks.
//!
//! ## Example
//!
//! ```
//! use tilegrid_core::mirror::{ChangeHandler, CollectionChange, PrefixMirror};
//!
//! let mut source = vec!['a', 'b', 'c', 'd'];
//! let mut top = PrefixMirror::bound_to(3, &source)?;
//! assert_eq!(top.as_slice(), &['a', 'b', 'c']);
//!
//! source.remove(0);
//! top.apply(&source, &CollectionChange::Remove { index: 0 })?;
//! assert_eq!(top.as_slice(), &['b', 'c', 'd']);
//! # Ok::<(), tilegrid_core::TileError>(())
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::error::{Result, TileError};

/// Preview size used when nothing else is configured.
///
/// Twelve tiles fill whole grid columns whether the layout shows 1, 2, 3, 4
/// or 6 rows.
pub const DEFAULT_PREVIEW_CAPACITY: usize = 12;

/// Read access into the observed source collection.
pub trait SourceView<T> {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&T>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> SourceView<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T> SourceView<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T> SourceView<T> for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }
}

/// One mutation of the source collection, as reported after it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollectionChange {
    /// An element now sits at `index`
    Insert { index: usize },
    /// The element at `old_index` now sits at `new_index`
    Move { old_index: usize, new_index: usize },
    /// The element previously at `index` is gone
    Remove { index: usize },
    /// The element at `index` was swapped for another one
    Replace { index: usize },
    /// Contents were replaced wholesale
    Reset,
}

impl CollectionChange {
    pub fn action(&self) -> &'static str {
        match self {
            CollectionChange::Insert { .. } => "insert",
            CollectionChange::Move { .. } => "move",
            CollectionChange::Remove { .. } => "remove",
            CollectionChange::Replace { .. } => "replace",
            CollectionChange::Reset => "reset",
        }
    }
}

impl fmt::Display for CollectionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionChange::Insert { index } => write!(f, "insert @{}", index),
            CollectionChange::Move {
                old_index,
                new_index,
            } => write!(f, "move {} -> {}", old_index, new_index),
            CollectionChange::Remove { index } => write!(f, "remove @{}", index),
            CollectionChange::Replace { index } => write!(f, "replace @{}", index),
            CollectionChange::Reset => write!(f, "reset"),
        }
    }
}

/// Receives change notifications from an ordered collection.
///
/// `source` is always the post-mutation state of the collection.
pub trait ChangeHandler<T> {
    fn on_insert<S: SourceView<T> + ?Sized>(&mut self, source: &S, index: usize) -> Result<()>;

    fn on_move<S: SourceView<T> + ?Sized>(
        &mut self,
        source: &S,
        old_index: usize,
        new_index: usize,
    ) -> Result<()>;

    fn on_remove<S: SourceView<T> + ?Sized>(&mut self, source: &S, index: usize) -> Result<()>;

    fn on_replace<S: SourceView<T> + ?Sized>(&mut self, source: &S, index: usize) -> Result<()>;

    fn on_reset<S: SourceView<T> + ?Sized>(&mut self, source: &S) -> Result<()>;

    /// Dispatch a typed notification to the matching handler
    fn apply<S: SourceView<T> + ?Sized>(
        &mut self,
        source: &S,
        change: &CollectionChange,
    ) -> Result<()> {
        match *change {
            CollectionChange::Insert { index } => self.on_insert(source, index),
            CollectionChange::Move {
                old_index,
                new_index,
            } => self.on_move(source, old_index, new_index),
            CollectionChange::Remove { index } => self.on_remove(source, index),
            CollectionChange::Replace { index } => self.on_replace(source, index),
            CollectionChange::Reset => self.on_reset(source),
        }
    }
}

/// Capacity-bounded mirror of a source collection's prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMirror<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Clone> PrefixMirror<T> {
    /// Create an empty mirror. Fails with [`TileError::Config`] when
    /// `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TileError::config("preview capacity must be at least 1"));
        }

        Ok(Self {
            // One spare slot: insert-then-trim briefly holds K + 1 elements
            items: Vec::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Create a mirror already populated from `source`
    pub fn bound_to<S: SourceView<T> + ?Sized>(capacity: usize, source: &S) -> Result<Self> {
        let mut mirror = Self::new(capacity)?;
        mirror.refill(source);
        Ok(mirror)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    fn refill<S: SourceView<T> + ?Sized>(&mut self, source: &S) {
        self.items.clear();
        let wanted = self.capacity.min(source.len());
        self.items
            .extend((0..wanted).filter_map(|index| source.get(index).cloned()));
    }

    /// Append `source[K - 1]` when the source still reaches that far
    fn backfill<S: SourceView<T> + ?Sized>(
        &mut self,
        source: &S,
        action: &'static str,
    ) -> Result<()> {
        if source.len() >= self.capacity {
            let element = read(source, action, self.capacity - 1)?.clone();
            self.items.push(element);
        }
        Ok(())
    }

    fn check_mirror_index(&self, action: &'static str, index: usize, inclusive: bool) -> Result<()> {
        let len = self.items.len();
        let ok = if inclusive { index <= len } else { index < len };
        if ok {
            Ok(())
        } else {
            Err(TileError::out_of_bounds(action, "mirror", index, len))
        }
    }
}

impl<T> PrefixMirror<T> {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once the mirror holds `capacity` elements
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> PrefixMirror<T> {
    /// Recompute the expected prefix from `source` and compare
    pub fn is_prefix_of<S: SourceView<T> + ?Sized>(&self, source: &S) -> bool {
        let expected = self.capacity.min(source.len());
        self.items.len() == expected
            && self
                .items
                .iter()
                .enumerate()
                .all(|(index, element)| source.get(index) == Some(element))
    }
}

impl<T> AsRef<[T]> for PrefixMirror<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a PrefixMirror<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn read<'a, T, S: SourceView<T> + ?Sized>(
    source: &'a S,
    action: &'static str,
    index: usize,
) -> Result<&'a T> {
    source
        .get(index)
        .ok_or_else(|| TileError::out_of_bounds(action, "source", index, source.len()))
}

impl<T: Clone> ChangeHandler<T> for PrefixMirror<T> {
    fn on_insert<S: SourceView<T> + ?Sized>(&mut self, source: &S, index: usize) -> Result<()> {
        const ACTION: &str = "insert";
        let element = read(source, ACTION, index)?;
        if index >= self.capacity {
            return Ok(());
        }
        self.check_mirror_index(ACTION, index, true)?;

        self.items.insert(index, element.clone());
        self.items.truncate(self.capacity);

        trace!(action = ACTION, index, mirror_len = self.items.len(), "preview updated");
        Ok(())
    }

    fn on_move<S: SourceView<T> + ?Sized>(
        &mut self,
        source: &S,
        old_index: usize,
        new_index: usize,
    ) -> Result<()> {
        const ACTION: &str = "move";
        if old_index == new_index {
            return Err(TileError::contract(
                ACTION,
                format!("old and new index are both {}", old_index),
            ));
        }
        read(source, ACTION, old_index)?;
        let entering = read(source, ACTION, new_index)?;

        match (old_index < self.capacity, new_index < self.capacity) {
            (true, true) => {
                self.check_mirror_index(ACTION, old_index, false)?;
                self.check_mirror_index(ACTION, new_index, false)?;
                let element = self.items.remove(old_index);
                self.items.insert(new_index, element);
            }
            (true, false) => {
                self.check_mirror_index(ACTION, old_index, false)?;
                self.items.remove(old_index);
                self.backfill(source, ACTION)?;
            }
            (false, true) => {
                self.check_mirror_index(ACTION, new_index, true)?;
                self.items.insert(new_index, entering.clone());
                // Trim only when over capacity; a full window is not assumed
                self.items.truncate(self.capacity);
            }
            (false, false) => return Ok(()),
        }

        trace!(
            action = ACTION,
            old_index,
            new_index,
            mirror_len = self.items.len(),
            "preview updated"
        );
        Ok(())
    }

    fn on_remove<S: SourceView<T> + ?Sized>(&mut self, source: &S, index: usize) -> Result<()> {
        const ACTION: &str = "remove";
        let remaining = source.len();
        if index > remaining {
            return Err(TileError::out_of_bounds(ACTION, "source", index, remaining + 1));
        }
        if index >= self.capacity {
            return Ok(());
        }
        self.check_mirror_index(ACTION, index, false)?;

        self.items.remove(index);
        self.backfill(source, ACTION)?;

        trace!(action = ACTION, index, mirror_len = self.items.len(), "preview updated");
        Ok(())
    }

    fn on_replace<S: SourceView<T> + ?Sized>(&mut self, source: &S, index: usize) -> Result<()> {
        const ACTION: &str = "replace";
        let element = read(source, ACTION, index)?;
        if index >= self.capacity {
            return Ok(());
        }
        self.check_mirror_index(ACTION, index, false)?;

        self.items[index] = element.clone();

        trace!(action = ACTION, index, "preview updated");
        Ok(())
    }

    fn on_reset<S: SourceView<T> + ?Sized>(&mut self, source: &S) -> Result<()> {
        self.refill(source);
        trace!(action = "reset", mirror_len = self.items.len(), "preview rebuilt");
        Ok(())
    }
}
