//! The chat-driven tool-orchestration loop.
//!
//! User input → transport → model → { text → conversation log;
//! tool calls → dispatcher → (maybe) silent auto-continuation → transport… }.
//! The whole chain runs under a single logical writer; see `session`.

pub mod conversation;
pub mod dispatcher;
pub mod policy;
pub mod session;
