//! Sequential model descriptions and initial weight blobs.
//!
//! A [`Model`] owns an ordered list of [`Layer`]s. From it the crate counts the trainable
//! parameters of every layer, fills them with random initial values and persists them in a
//! small versioned binary format (see [`blob`]).

pub mod blob;
pub mod cleanup;
pub mod counting;
pub mod error;
pub mod initialization;
pub mod layers;
pub mod materialize;
pub mod model;
pub mod specs;
pub mod status;

pub use blob::{BlobHeader, HEADER_LEN, MAGIC, VERSION, Version};
pub use cleanup::{DirCleanup, NoCleanup, WorkspaceCleanup};
pub use counting::{LayerParams, ParamCounts};
pub use error::{FahrenErr, Result};
pub use initialization::{ConstParamGen, ParamGen, RandParamGen};
pub use layers::{Layer, LayerKind, Layers, alloc_layers};
pub use materialize::Params;
pub use model::{DEFAULT_INITIAL_WEIGHTS_PATH, Model, ModelKind};
pub use specs::{LayerSpec, ModelSpec};
pub use status::Status;
