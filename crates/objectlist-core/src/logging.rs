//! Logging facilities for ObjectList.
//!
//! ObjectList uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("objectlist::edit=debug,objectlist::sort=trace")
//!     .init();
//! ```
//!
//! Reflective lookups that fail are reported here rather than surfaced as
//! errors, so enabling the `objectlist::aspect` target is the first step when
//! a column shows a "Cannot invoke" diagnostic.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "objectlist_core::signal";
    /// Deferred work and mailbox target.
    pub const TASK: &str = "objectlist::task";
    /// Aspect path resolution.
    pub const ASPECT: &str = "objectlist::aspect";
    /// Row comparison and sorting.
    pub const SORT: &str = "objectlist::sort";
    /// Group partitioning.
    pub const GROUP: &str = "objectlist::group";
    /// Column width allocation.
    pub const LAYOUT: &str = "objectlist::layout";
    /// Cell edit sessions.
    pub const EDIT: &str = "objectlist::edit";
    /// State snapshots.
    pub const STATE: &str = "objectlist::state";
    /// Model collection changes.
    pub const OBJECTS: &str = "objectlist::objects";
}

/// Span names used for performance tracing.
pub mod span_names {
    /// Full list rebuild.
    pub const BUILD_LIST: &str = "objectlist::build_list";
    /// Sort pass.
    pub const SORT: &str = "objectlist::sort";
    /// Group pass.
    pub const BUILD_GROUPS: &str = "objectlist::build_groups";
}

/// A guard that records how long an operation takes.
///
/// The span is entered on creation and exited when the guard is dropped.
///
/// ```
/// use objectlist_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("rebuild");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "objectlist::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}
