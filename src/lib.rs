pub mod bridge;
pub mod codec;
pub mod error;
pub mod event;
pub mod exporter;
pub mod host;
pub mod importer;
pub mod manager;
pub mod midi;
pub mod model;
pub mod registry;
pub mod scs;

pub use bridge::Lisp2Scs;
pub use error::{Result, ScsError};
pub use event::TranslationEvent;
pub use manager::ShowModelManager;
pub use model::ShowModel;
