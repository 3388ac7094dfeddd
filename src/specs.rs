use rand::rngs::StdRng;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use crate::{
    FahrenErr, Layer, LayerKind, ModelKind, RandParamGen, Result, initialization::rng_from_seed,
};

/// The specification for the `Layer` struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LayerSpec {
    pub density: u32,
    #[serde(default)]
    pub kind: LayerKind,
    #[serde(default)]
    pub predecessor: Option<usize>,
}

/// The specification for the `Model` struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelSpec {
    #[serde(default)]
    pub kind: ModelKind,
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ModelSpec {
    /// Parses a model specification from json.
    ///
    /// # Arguments
    /// * `json` - The json document.
    ///
    /// # Returns
    /// An `InvalidArgument` error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FahrenErr::invalid(format!("malformed model spec: {e}")))
    }

    /// Resolves the kind and layers of the specified model.
    ///
    /// The layers are validated later, when a `Model` takes ownership of them.
    pub fn build(&self) -> Result<(ModelKind, Vec<Layer>)> {
        if self.layers.is_empty() {
            return Err(FahrenErr::invalid("the model spec has no layers"));
        }

        let layers = self
            .layers
            .iter()
            .map(|spec| Layer {
                density: spec.density,
                kind: spec.kind,
                predecessor: spec.predecessor,
            })
            .collect();

        Ok((self.kind, layers))
    }

    /// Creates the default uniform parameter generator, seeded with `seed` if present.
    pub fn param_gen(&self) -> Result<RandParamGen<StdRng, Uniform<f32>>> {
        let rng = rng_from_seed(self.seed)?;
        Ok(RandParamGen::default_uniform(rng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParamGen, Status};

    const JSON: &str = r#"{
        "kind": "sequential",
        "layers": [
            { "density": 4, "kind": "convolutional" },
            { "density": 10, "kind": "dense", "predecessor": 0 },
            { "density": 2, "predecessor": 1 }
        ],
        "seed": 42
    }"#;

    #[test]
    fn parse() {
        let spec = ModelSpec::from_json(JSON).unwrap();

        assert_eq!(spec.kind, ModelKind::Sequential);
        assert_eq!(spec.seed, Some(42));

        let (_, layers) = spec.build().unwrap();
        assert_eq!(
            layers,
            [
                Layer::conv(4),
                Layer::dense(10).after(0),
                Layer::dense(2).after(1),
            ]
        );
    }

    #[test]
    fn defaults() {
        let spec = ModelSpec::from_json(r#"{ "layers": [{ "density": 3 }] }"#).unwrap();

        assert_eq!(spec.kind, ModelKind::Sequential);
        assert_eq!(spec.seed, None);
        assert_eq!(spec.layers[0].kind, LayerKind::Dense);
        assert_eq!(spec.layers[0].predecessor, None);
    }

    #[test]
    fn malformed() {
        let err = ModelSpec::from_json(r#"{ "layers": [{ "density": -1 }] }"#).unwrap_err();
        assert_eq!(err.status(), Status::InvalidArgument);

        let err = ModelSpec::from_json(r#"{ "layers": [] }"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err.status(), Status::InvalidArgument);
    }

    #[test]
    fn seeded_param_gen() {
        let spec = ModelSpec::from_json(JSON).unwrap();
        let (mut xs, mut ys) = ([0f32; 8], [0f32; 8]);

        spec.param_gen().unwrap().fill(&mut xs);
        spec.param_gen().unwrap().fill(&mut ys);

        assert_eq!(xs, ys);
    }
}
