//! Core module - store, query engine, notification and persistence

pub mod config;
pub mod dirty;
pub mod error;
pub mod events;
pub mod interchange;
pub mod labels;
pub mod query;
pub mod session;
pub mod storage;
pub mod store;
pub mod theme;

pub use config::Config;
pub use dirty::{status_message, DirtyTracker};
pub use error::InventoryError;
pub use events::{ChangeNotifier, Event, EventKind, Observer, ObserverError, Payload, PersistKind};
pub use labels::LabelSelection;
pub use query::{run_query, LocationFilter, QuerySpec, SortColumn, ViewSummary};
pub use session::{ImportReport, QuitChoice, QuitOutcome, Session};
pub use storage::{JsonStorage, LoadProblem, Loaded, Persistence};
pub use store::{ImportSummary, ItemStore, RemoveOutcome, UpdateOutcome};
pub use theme::Theme;
