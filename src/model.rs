use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    FahrenErr, Layer, Layers, ParamCounts, ParamGen, Params, RandParamGen, Result, VERSION,
    WorkspaceCleanup, blob, initialization::rng_from_seed, specs::ModelSpec,
};

/// Where `Model::write_initial_weights` writes.
pub const DEFAULT_INITIAL_WEIGHTS_PATH: &str = "fahren_initial_model.bin";

/// The architecture of a model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Sequential,
}

/// A model handle: created uninitialized, initialized once with its layers and shut down when
/// it's no longer needed.
///
/// A handle provides no synchronization, callers must not write from it concurrently.
#[derive(Debug, Default)]
pub struct Model {
    kind: ModelKind,
    layers: Option<Layers>,
}

impl Model {
    /// Creates a new uninitialized `Model`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and initializes a `Model` from its specification.
    ///
    /// # Arguments
    /// * `spec` - The specification of the model.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        let (kind, layers) = spec.build()?;
        let mut model = Self::new();
        model.init(kind, layers)?;
        Ok(model)
    }

    /// Initializes the model, taking ownership of its layers.
    ///
    /// Initializing an already initialized model replaces its layers.
    ///
    /// # Arguments
    /// * `kind` - The architecture of the model.
    /// * `layers` - The layers in sequence order.
    ///
    /// # Returns
    /// An `InvalidArgument` error if `layers` isn't a valid sequence, the model is left
    /// untouched in that case.
    pub fn init(&mut self, kind: ModelKind, layers: Vec<Layer>) -> Result<()> {
        let layers = Layers::new(layers)?;

        if self.is_initialized() {
            warn!("reinitializing an already initialized model");
        }

        info!("initialized {kind:?} model with {} layers", layers.len());
        self.kind = kind;
        self.layers = Some(layers);
        Ok(())
    }

    /// Initializes the model and then writes its initial weights to
    /// `DEFAULT_INITIAL_WEIGHTS_PATH`.
    ///
    /// Failing to write the initial weights does not fail the initialization.
    ///
    /// # Arguments
    /// * `kind` - The architecture of the model.
    /// * `layers` - The layers in sequence order.
    pub fn init_with_initial_weights(&mut self, kind: ModelKind, layers: Vec<Layer>) -> Result<()> {
        self.init(kind, layers)?;

        if let Err(e) = self.write_initial_weights() {
            warn!("failed to write the initial weights: {e}");
        }

        Ok(())
    }

    /// Shuts the model down, dropping its layers and sweeping the workspace.
    ///
    /// # Arguments
    /// * `cleanup` - The cleanup to run once the model is reset.
    ///
    /// # Returns
    /// A `NotInitialized` error if the model wasn't initialized.
    pub fn shutdown<C: WorkspaceCleanup>(&mut self, mut cleanup: C) -> Result<()> {
        if self.layers.take().is_none() {
            return Err(FahrenErr::NotInitialized);
        }

        self.kind = ModelKind::default();
        cleanup.sweep();

        info!("model shut down");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.layers.is_some()
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Returns the layers of the model, if initialized.
    pub fn layers(&self) -> Option<&Layers> {
        self.layers.as_ref()
    }

    /// Counts the parameters of the model.
    ///
    /// # Returns
    /// The counts, a `NotInitialized` error or an `Overflow` error.
    pub fn param_counts(&self) -> Result<ParamCounts> {
        let layers = self.layers.as_ref().ok_or(FahrenErr::NotInitialized)?;
        ParamCounts::count(layers)
    }

    /// Writes freshly generated initial weights to `DEFAULT_INITIAL_WEIGHTS_PATH`.
    pub fn write_initial_weights(&self) -> Result<()> {
        self.write_weights(DEFAULT_INITIAL_WEIGHTS_PATH)
    }

    /// Writes the blob of randomly initialized parameters, uniform over `[-0.5, 0.5)`.
    ///
    /// # Arguments
    /// * `path` - The destination file.
    pub fn write_weights<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let param_gen = RandParamGen::default_uniform(rng_from_seed(None)?)?;
        self.write_weights_with(path, param_gen)
    }

    /// Writes the blob of parameters initialized by `param_gen`.
    ///
    /// # Arguments
    /// * `path` - The destination file.
    /// * `param_gen` - The generator of the initial values.
    ///
    /// # Returns
    /// An `InvalidArgument` error if `path` is empty, a `NotInitialized` error if the model isn't
    /// initialized (no file gets created) or any counting, allocation or io error.
    pub fn write_weights_with<P, G>(&self, path: P, param_gen: G) -> Result<()>
    where
        P: AsRef<Path>,
        G: ParamGen,
    {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FahrenErr::invalid("the destination path is empty"));
        }

        let counts = self.param_counts()?;
        let params = Params::materialize(&counts, param_gen)?;
        blob::write_blob_file(path, VERSION, &params)?;

        info!(
            "wrote {} weights and {} biases to {}",
            counts.total_weights(),
            counts.total_biases(),
            path.display()
        );

        Ok(())
    }
}
