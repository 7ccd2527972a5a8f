//! Field-tree editing and history engine for a visual form builder.
//!
//! The crate owns the canonical in-memory form: a tree of field configs, some
//! grouped into side-by-side rows. It mutates that tree in response to palette
//! clicks, drag-and-drop and property edits, and keeps an undo/redo history of
//! whole-tree snapshots. Hosts feed gestures into [`engine::EditorCore`] and
//! process the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor core routing gestures to the store |
//! | [`store`] | Field tree store: fields, selection, title, mutations |
//! | [`history`] | Bounded undo/redo stacks of tree snapshots |
//! | [`doc`] | Field node model and tree walks |
//! | [`layout`] | Beside-drop composition of two-column rows |
//! | [`input`] | Drag gesture state machine and drop intents |
//! | [`hit`] | Geometry and drop-side resolution |
//! | [`palette`] | Palette entries and new-field defaults |
//! | [`document`] | Export/import document codec |
//! | [`catalog`] | Template catalog |
//! | [`render`] | Value model seeding and text outline |
//! | [`consts`] | Shared constants (class tokens, key shapes, defaults) |

pub mod catalog;
pub mod consts;
pub mod doc;
pub mod document;
pub mod engine;
pub mod history;
pub mod hit;
pub mod input;
pub mod layout;
pub mod palette;
pub mod render;
pub mod store;
