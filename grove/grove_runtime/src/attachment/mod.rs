//! Capability attachments.
//!
//! One live attachment per attached identity. The table lives on the
//! caller's side; attachment contents are only touched by the worker lane.

mod manager;

pub use manager::AttachmentManager;
