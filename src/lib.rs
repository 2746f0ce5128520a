pub mod action;
pub mod company;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod milestone;
pub mod persistence;
pub mod progress;
pub mod registry;
pub mod status;
pub mod target;
pub mod task;
pub mod topic;
pub(crate) mod validation;

pub use action::Action;
pub use company::{Company, Profile, Role};
pub use milestone::Milestone;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRegistryStore;
pub use persistence::{
    PersistenceError, RegistryStore, load_registry_from_csv, load_registry_from_json,
    save_registry_to_csv, save_registry_to_json, validate_registry,
};
pub use progress::{ProgressValue, StatusBreakdown, completion_ratio, completion_ratio_raw};
pub use registry::{ProgressReport, Registry, RegistryError, TargetProgressEntry};
pub use status::WorkStatus;
pub use target::{Target, TargetType};
pub use task::Task;
pub use topic::{Materiality, Topic};
