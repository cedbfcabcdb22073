pub mod export;
pub mod ffi;
pub mod model;
pub mod store;

pub use export::{build_share_artifact, export, ShareArtifact, ShareFormat};
pub use model::*;
pub use store::{RecipeStore, StoreConfig};

uniffi::setup_scaffolding!();
