//! # toolloop core
//!
//! Domain types, traits, and error definitions shared by every toolloop
//! crate. Nothing in here talks to the network or the filesystem.
//!
//! ## Seams
//!
//! - [`ModelInvoker`]: prompt in, completion text out
//! - [`Tool`]: JSON input in, JSON output (or a [`ToolError`]) out
//! - [`ToolRegistry`]: identifier → tool lookup, in registration order
//!
//! Engines in `toolloop-agent` are written against these traits only, so
//! tests swap in scripted invokers and in-process tools.

pub mod error;
pub mod invoker;
pub mod policy;
pub mod tool;

pub use error::{Error, ProviderError, Result, ToolError};
pub use invoker::{ModelInvoker, ModelRequest};
pub use policy::{DuplicatePolicy, UnknownToolPolicy};
pub use tool::{FnTool, Tool, ToolEntry, ToolRegistry, ToolSummary, render_output};
