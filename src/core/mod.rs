// src/core/mod.rs

//! Filesystem probes and tool wrappers built on the process execution layer.

pub mod file_ops;
pub mod fs_probe;
pub mod permissions;
pub mod tools;
