// Application layer - Use case interactors

pub mod container;
pub mod export_interactor;
pub mod queue_interactor;
pub mod replay_interactor;

// Re-export interactors
pub use container::{AppContainer, ContainerOptions, DefaultAppContainer};
pub use export_interactor::{ExportKind, ExportRequestBuilder};
pub use queue_interactor::{ExportQueue, ExportReport};
pub use replay_interactor::{EventScript, ReplayInteractor, ReplayReport, ScriptEvent};
