//! `greenerp-catalog` — item catalog domain.

pub mod item;

pub use item::{Item, ItemPatch, NewItem};
