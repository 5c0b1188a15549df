//! Canvas transform engine for a slide editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and also
//! builds natively for the replay CLI and tests. It owns the editing surface
//! of one fixed 960×540 slide: hit-testing and selecting elements, dragging,
//! resizing and rotating them with per-kind semantics, freehand drawing,
//! inline text editing, and fit-to-container zoom. The host layer wires DOM
//! events to the engine and persists the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`element`] | Element model: kinds, geometry, sparse patches |
//! | [`doc`] | Document store: elements, selection, drawing config |
//! | [`stage`] | Live node transforms shown during gestures |
//! | [`transform`] | Transform-end reinterpretation and handle gesture math |
//! | [`hit`] | Hit-testing against elements and handles |
//! | [`snap`] | Smart-guide snapping while dragging |
//! | [`freehand`] | Freehand stroke capture |
//! | [`text_edit`] | Inline text edit session and overlay placement |
//! | [`viewport`] | Zoom and screen/logical coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`config`] | Runtime tuning knobs |
//! | [`error`] | Errors for snapshot parsing and I/O |
//! | [`consts`] | Shared numeric constants (canvas size, attribute floors, zoom limits) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod error;
pub mod freehand;
pub mod hit;
pub mod input;
pub mod render;
pub mod snap;
pub mod stage;
pub mod text_edit;
pub mod transform;
pub mod viewport;
