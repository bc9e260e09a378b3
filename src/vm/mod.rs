//! Chunk execution: frames and the dispatch loop.

mod frame;
#[allow(clippy::module_inception)]
mod vm;

#[cfg(test)]
mod tests;

pub use vm::{Vm, VmResult};
