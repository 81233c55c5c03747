//! workflow-context library
//!
//! Helpers for Alfred workflow scripts: per-workflow storage directories,
//! plist settings, JSON-aware file I/O with atomic writes, Spotlight search,
//! HTTP requests and the feedback XML Alfred reads from stdout.
//!
//! ```no_run
//! use workflow_context::{ResultItem, Workflow};
//!
//! let mut wf = Workflow::new(None)?;
//! wf.add_result(ResultItem::new("Open", "Open the workflow folder", "icon.png").arg("open"));
//! println!("{}", wf.render_xml(None)?);
//! # Ok::<(), workflow_context::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod feedback;
pub mod files;
pub mod request;
pub mod settings;
pub mod shell;
pub mod workflow;

// Re-exports for library consumers
pub use error::{Error, Result};
pub use feedback::{ResultItem, ResultsOverride};
pub use files::Contents;
pub use request::RequestOptions;
pub use settings::{DefaultsStore, MemoryStore, SettingsStore};
pub use workflow::{Location, Workflow, WorkflowBuilder};
