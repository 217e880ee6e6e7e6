//! Leaf handlers, one module per top-level verb group.

pub(super) mod op;
pub(super) mod options;
pub(super) mod read;
pub(super) mod top;
pub(super) mod write;
