//! # Panepool Core
//!
//! Orchestration of agent panes inside named tmux sessions.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Layout
//!
//! - [`tmux`]: the narrow multiplexer command surface ([`tmux::Multiplexer`])
//!   with a real backend ([`tmux::TmuxCli`]) and an in-memory one
//!   ([`tmux::testing::FakeMultiplexer`])
//! - [`registry`]: session existence, creation, enumeration, destruction
//! - [`allocator`]: first-window resolution and monotonic pane reconciliation
//! - [`assigner`]: deterministic agent-to-pane assignment and launch
//! - [`router`]: tag-filtered command delivery, broadcast, interrupt
//! - [`capture`] / [`inspector`]: scrollback capture and status reports
//! - [`view`]: re-tiling and zoom
//!
//! Every operation issues multiplexer calls one at a time and awaits each
//! before the next; nothing here runs concurrently.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::panic))]

pub mod allocator;
pub mod assigner;
pub mod capture;
pub mod config;
pub mod confirm;
mod error;
pub mod inspector;
pub mod json;
mod output_format;
pub mod registry;
pub mod router;
pub mod tag;
pub mod tmux;
pub mod types;
pub mod view;

pub use allocator::PaneAllocator;
pub use assigner::{AgentAssigner, Assignment};
pub use capture::{Capture, CaptureOutcome, OutputCapture, PaneSelector, SaveReport};
pub use config::Config;
pub use confirm::{Confirm, FixedAnswer};
pub use error::{Error, ExecutionError, SystemError, ValidationError};
pub use inspector::{SessionInspector, StatusReport};
pub use output_format::OutputFormat;
pub use registry::{SessionHandle, SessionRegistry, Teardown};
pub use router::{BroadcastTarget, CommandRouter, RouteFilter, RouteOutcome};
pub use tag::{AgentCounts, AgentTag, AgentType, TagKind};
pub use tmux::{Multiplexer, PaneScope, TmuxCli};
pub use types::{PaneId, PaneInfo, SessionName, SessionSummary, WindowInfo, WindowRef};
pub use view::{ViewManager, ZoomTarget};

/// Result type for all fallible core operations.
pub type Result<T> = std::result::Result<T, Error>;
