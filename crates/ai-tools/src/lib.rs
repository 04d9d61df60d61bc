//! Tooling primitives for deterministic game AI.
//!
//! Engine-agnostic and lightweight: agents record `TraceEvent`s through a [`Tracer`], tooling
//! renders or diffs them afterwards. Engine integrations belong in adapter crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, Tracer, VecTraceSink};
