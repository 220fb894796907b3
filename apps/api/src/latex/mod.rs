//! LaTeX generation: escaping of untrusted text and document assembly.

pub mod assembler;
pub mod escape;

pub use assembler::assemble;
