use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{FahrenErr, Result};

/// The kind of a layer, it decides how its weights are counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    #[default]
    Dense,
    Convolutional,
    Recurrent,
}

/// A single layer of a sequential model.
///
/// The predecessor is the index of another layer of the same sequence, its density is the
/// input dimension of this layer. A layer without predecessor has an input dimension of 1.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub density: u32,
    pub kind: LayerKind,
    pub predecessor: Option<usize>,
}

impl Layer {
    /// Creates a new `Layer` without predecessor.
    ///
    /// # Arguments
    /// * `kind` - The kind of layer.
    /// * `density` - The amount of output units or filters.
    ///
    /// # Returns
    /// A new `Layer` instance.
    pub fn new(kind: LayerKind, density: u32) -> Self {
        Self {
            density,
            kind,
            predecessor: None,
        }
    }

    pub fn dense(density: u32) -> Self {
        Self::new(LayerKind::Dense, density)
    }

    pub fn conv(density: u32) -> Self {
        Self::new(LayerKind::Convolutional, density)
    }

    pub fn recurrent(density: u32) -> Self {
        Self::new(LayerKind::Recurrent, density)
    }

    /// Sets the predecessor of this layer.
    ///
    /// # Arguments
    /// * `index` - The index of the previous layer in the sequence.
    pub fn after(mut self, index: usize) -> Self {
        self.predecessor = Some(index);
        self
    }
}

/// Allocates `count` zero-initialized layers.
///
/// # Arguments
/// * `count` - The amount of layers.
///
/// # Returns
/// `None` if `count` is zero.
pub fn alloc_layers(count: usize) -> Option<Vec<Layer>> {
    if count == 0 {
        return None;
    }

    Some(vec![Layer::default(); count])
}

/// A validated, non empty sequence of layers where every predecessor comes strictly before
/// the layer that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers(Vec<Layer>);

impl Layers {
    /// Validates and wraps a layer sequence.
    ///
    /// # Arguments
    /// * `layers` - The layers in sequence order.
    ///
    /// # Returns
    /// An `InvalidArgument` error if the sequence is empty, a layer has zero density or a
    /// predecessor index does not point backwards.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(FahrenErr::invalid("the layer sequence is empty"));
        }

        for (i, layer) in layers.iter().enumerate() {
            if layer.density == 0 {
                return Err(FahrenErr::invalid(format!(
                    "the {i}-th layer has zero density"
                )));
            }

            match layer.predecessor {
                Some(prev) if prev >= i => {
                    return Err(FahrenErr::invalid(format!(
                        "the {i}-th layer references the {prev}-th layer as its predecessor"
                    )));
                }
                _ => {}
            }
        }

        Ok(Self(layers))
    }

    /// Returns the input dimension of the `i`-th layer.
    pub(crate) fn in_dim(&self, i: usize) -> usize {
        self.0[i]
            .predecessor
            .map_or(1, |prev| self.0[prev].density as usize)
    }

    pub fn into_inner(self) -> Vec<Layer> {
        self.0
    }
}

impl Deref for Layers {
    type Target = [Layer];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<Layer>> for Layers {
    type Error = FahrenErr;

    fn try_from(value: Vec<Layer>) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn alloc_zero() {
        assert!(alloc_layers(0).is_none());
    }

    #[test]
    fn alloc_zeroed() {
        let layers = alloc_layers(3).unwrap();

        assert_eq!(layers.len(), 3);
        assert!(layers.iter().all(|l| *l == Layer::new(LayerKind::Dense, 0)));
    }

    #[test]
    fn empty_sequence() {
        let err = Layers::new(vec![]).unwrap_err();
        assert_eq!(err.status(), Status::InvalidArgument);
    }

    #[test]
    fn zero_density() {
        let err = Layers::new(alloc_layers(2).unwrap()).unwrap_err();
        assert_eq!(err.status(), Status::InvalidArgument);
    }

    #[test]
    fn forward_reference() {
        let layers = vec![Layer::dense(3).after(1), Layer::dense(2)];
        assert!(Layers::new(layers).is_err());
    }

    #[test]
    fn self_reference() {
        let layers = vec![Layer::dense(3), Layer::dense(2).after(1)];
        assert!(Layers::new(layers).is_err());
    }

    #[test]
    fn in_dims() {
        let layers = Layers::new(vec![
            Layer::dense(3),
            Layer::conv(5).after(0),
            Layer::dense(2).after(0),
        ])
        .unwrap();

        assert_eq!(layers.in_dim(0), 1);
        assert_eq!(layers.in_dim(1), 3);
        assert_eq!(layers.in_dim(2), 3);
    }
}
