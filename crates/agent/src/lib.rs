//! Tool layer for the leasing assistant.
//!
//! This crate is the deterministic half of the conversation: an external
//! LLM-driven dialogue engine decides, per user utterance, which named tool
//! to invoke and with what arguments; the tools here query the embedded
//! store, shape the result into a `{status, ...}` payload, and write derived
//! summaries into the per-conversation session state for later turns.
//!
//! # Architecture
//!
//! 1. **Session state** (`session`) - the mutable key→value bag threading
//!    context between tool calls, owned by the engine.
//! 2. **Natural-language lookup** (`nl`) - the fixed move-in month table and
//!    the relative-date / am-pm time normalizers.
//! 3. **Tools** (`tools`) - the nine named operations and the registry the
//!    engine dispatches through.
//! 4. **Engine boundary** (`engine`) - the trait and instruction text for
//!    the external dialogue engine.
//!
//! # Safety Principle
//!
//! The engine never touches the store directly and never invents data: every
//! price, availability count, and booking id flows out of a tool call. In
//! return, tools never raise for expected business conditions; not-found,
//! missing-precondition, and parse failures all come back as tagged error
//! payloads for the engine to render.

pub mod engine;
pub mod nl;
pub mod session;
pub mod tools;
