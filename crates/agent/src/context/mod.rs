//! Context for the reasoning loop.
//!
//! | Tier | Scope | Written by |
//! |------|-------|------------|
//! | Short-term | one task run | the loop, after each tool dispatch |
//! | Long-term | the embedding process | the caller, between runs |
//!
//! The assembler renders both tiers into the next prompt.

pub mod assembler;
pub mod long_term;
pub mod short_term;

pub use assembler::{MemoryAssembler, render_transcript};
pub use long_term::LongTermMemory;
pub use short_term::{ShortTermMemory, Step};
