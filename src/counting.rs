use log::debug;

use crate::{FahrenErr, HEADER_LEN, LayerKind, Layers, Result};

/// The weight multiplier of convolutional layers, they are assumed to use 3x3 kernels.
pub const CONV_KERNEL_FACTOR: usize = 9;

/// The amount of parameters owned by a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerParams {
    pub weights: usize,
    pub biases: usize,
}

/// The parameter counts of an entire sequence of layers.
///
/// Only built by `ParamCounts::count`, so the per layer counts always add up to the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamCounts {
    pub(crate) layers: Vec<LayerParams>,
    pub(crate) total_weights: usize,
    pub(crate) total_biases: usize,
}

impl ParamCounts {
    /// Counts the parameters of every layer in `layers`.
    ///
    /// A layer has `in_dim * out_dim` weights, times `CONV_KERNEL_FACTOR` for convolutional
    /// layers, and `out_dim` biases.
    ///
    /// # Arguments
    /// * `layers` - The layer sequence.
    ///
    /// # Returns
    /// The counts or an `Overflow` error if any product or running total does not fit a `usize`.
    pub fn count(layers: &Layers) -> Result<Self> {
        let mut counts = Vec::with_capacity(layers.len());
        let mut total_weights: usize = 0;
        let mut total_biases: usize = 0;

        for (i, layer) in layers.iter().enumerate() {
            let overflow = || FahrenErr::Overflow { layer: i };

            let in_dim = layers.in_dim(i);
            let out_dim = layer.density as usize;

            let mut weights = in_dim.checked_mul(out_dim).ok_or_else(overflow)?;
            if layer.kind == LayerKind::Convolutional {
                weights = weights
                    .checked_mul(CONV_KERNEL_FACTOR)
                    .ok_or_else(overflow)?;
            }

            total_weights = total_weights.checked_add(weights).ok_or_else(overflow)?;
            total_biases = total_biases.checked_add(out_dim).ok_or_else(overflow)?;

            counts.push(LayerParams {
                weights,
                biases: out_dim,
            });
        }

        debug!("counted {total_weights} weights and {total_biases} biases");

        Ok(Self {
            layers: counts,
            total_weights,
            total_biases,
        })
    }

    /// Returns the parameter counts of each layer, in sequence order.
    pub fn layers(&self) -> &[LayerParams] {
        &self.layers
    }

    pub fn total_weights(&self) -> usize {
        self.total_weights
    }

    pub fn total_biases(&self) -> usize {
        self.total_biases
    }

    /// Returns the size in bytes of the blob holding these parameters.
    ///
    /// # Returns
    /// `None` if the size does not fit a `usize`.
    pub fn blob_len(&self) -> Option<usize> {
        let scalars = self.total_weights.checked_add(self.total_biases)?;
        scalars.checked_mul(size_of::<f32>())?.checked_add(HEADER_LEN)
    }
}
