//! Contracts for the host shell's collaborators.
//!
//! The engine never talks to a browser directly. Everything it needs from
//! the outside world is expressed as a small trait or data type here:
//!
//! - [`TabProvider`]: enumerate tabs and issue tab commands
//! - [`KeyValueStore`]: the asynchronous persistent store
//! - [`ContentInjector`]: run guard source text in a page
//! - [`IndicatorSurface`]: the two-state lock indicator
//! - [`InboundMessage`]: messages arriving from pages and the settings UI
//!
//! Tab lifecycle *events* flow the other way: the host shell calls the
//! engine's `on_*` handlers directly, so no subscription object exists.

mod indicator;
mod inject;
mod messages;
mod store;
mod tabs;

pub use indicator::{IndicatorState, IndicatorSurface};
pub use inject::{ContentInjector, INSTALL_GUARD_SRC, REMOVE_GUARD_SRC, scriptable_url};
pub use messages::{InboundMessage, OptionPatch};
pub use store::KeyValueStore;
pub use tabs::{LoadStatus, TabChange, TabId, TabInfo, TabProvider};
