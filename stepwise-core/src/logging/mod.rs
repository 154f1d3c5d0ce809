//! In-memory run log.
//!
//! The controller records run lifecycle events (started, paused, resumed,
//! speed changed, finished, failed, reset) here, tagged with the run id and
//! algorithm. A presentation layer can subscribe for live updates or query
//! the buffer afterwards. Process-level diagnostics go through `tracing`;
//! this log is for the user-facing activity feed.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌───────────────┐
//! │ LogContext  │────>│ BufferedCollector│────>│ Subscribers   │
//! │ (run_id)    │     │ (ring buffer)    │     │ (callbacks)   │
//! └─────────────┘     └──────────────────┘     └───────────────┘
//! ```

mod collector;
mod event;

pub use collector::{BufferedCollector, DEFAULT_BUFFER_CAPACITY, LogCollector, LogContext};
pub use event::{LogCategory, LogEvent, LogLevel};
