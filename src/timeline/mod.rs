//! Ordering of bookends and photo segments into one frame-accurate timeline.

pub mod assembler;
