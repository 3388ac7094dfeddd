use std::mem;

use log::debug;

use crate::{FahrenErr, ParamCounts, ParamGen, Result};

/// The initial parameters of a model, every layer's slice laid out in sequence order.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

impl Params {
    /// Allocates and fills the parameter buffers described by `counts`.
    ///
    /// Layers are visited in order and each one draws its weights and then its biases from
    /// `param_gen`.
    ///
    /// # Arguments
    /// * `counts` - The parameter counts of the model.
    /// * `param_gen` - The generator of the initial values.
    ///
    /// # Returns
    /// The filled buffers, or an error if a buffer could not be allocated or `param_gen` got
    /// exhausted before filling them.
    pub fn materialize<P: ParamGen>(counts: &ParamCounts, mut param_gen: P) -> Result<Self> {
        let mut weights = alloc("weights", counts.total_weights())?;
        let mut biases = alloc("biases", counts.total_biases())?;

        let mut w_rest = weights.as_mut_slice();
        let mut b_rest = biases.as_mut_slice();

        for layer in counts.layers() {
            let (w, rest) = split("weights", mem::take(&mut w_rest), layer.weights)?;
            fill(&mut param_gen, w)?;
            w_rest = rest;

            let (b, rest) = split("biases", mem::take(&mut b_rest), layer.biases)?;
            fill(&mut param_gen, b)?;
            b_rest = rest;
        }

        debug!(
            "materialized {} weights and {} biases",
            weights.len(),
            biases.len()
        );

        Ok(Self { weights, biases })
    }

    /// Returns the slices of `weights` and `biases` owned by each layer.
    ///
    /// Stops at the first layer whose slices don't fit in the buffers.
    ///
    /// # Arguments
    /// * `counts` - The parameter counts these buffers were materialized from.
    pub fn per_layer<'a>(
        &'a self,
        counts: &'a ParamCounts,
    ) -> impl Iterator<Item = (&'a [f32], &'a [f32])> + 'a {
        let mut w_rest = self.weights.as_slice();
        let mut b_rest = self.biases.as_slice();

        counts.layers().iter().map_while(move |layer| {
            let (w, w_tail) = w_rest.split_at_checked(layer.weights)?;
            let (b, b_tail) = b_rest.split_at_checked(layer.biases)?;
            w_rest = w_tail;
            b_rest = b_tail;
            Some((w, b))
        })
    }
}

/// Allocates a zeroed buffer of `len` values without aborting on failure.
fn alloc(what: &'static str, len: usize) -> Result<Vec<f32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| FahrenErr::Allocation { what, len })?;

    buf.resize(len, 0.);
    Ok(buf)
}

/// Splits the first `len` values off `buf`.
fn split<'a>(
    what: &'static str,
    buf: &'a mut [f32],
    len: usize,
) -> Result<(&'a mut [f32], &'a mut [f32])> {
    let got = buf.len();
    buf.split_at_mut_checked(len)
        .ok_or(FahrenErr::SizeMismatch {
            what,
            got,
            expected: len,
        })
}

fn fill<P: ParamGen>(param_gen: &mut P, out: &mut [f32]) -> Result<()> {
    let expected = out.len();
    let got = param_gen.fill(out);

    if got < expected {
        return Err(FahrenErr::ParamGenExhausted { got, expected });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{ConstParamGen, Layer, LayerParams, Layers, RandParamGen, Status};

    /// Generates 0, 1, 2, ... so the draw order becomes visible.
    struct Counter(f32);

    impl ParamGen for Counter {
        fn fill(&mut self, out: &mut [f32]) -> usize {
            for x in out.iter_mut() {
                *x = self.0;
                self.0 += 1.;
            }

            out.len()
        }
    }

    fn counts(layers: Vec<Layer>) -> ParamCounts {
        ParamCounts::count(&Layers::new(layers).unwrap()).unwrap()
    }

    #[test]
    fn draw_order() {
        let counts = counts(vec![Layer::dense(3), Layer::dense(2).after(0)]);
        let params = Params::materialize(&counts, Counter(0.)).unwrap();

        assert_eq!(params.weights, [0., 1., 2., 6., 7., 8., 9., 10., 11.]);
        assert_eq!(params.biases, [3., 4., 5., 12., 13.]);

        let slices: Vec<_> = params.per_layer(&counts).collect();
        assert_eq!(slices[0], (&[0., 1., 2.][..], &[3., 4., 5.][..]));
        assert_eq!(slices[1].1, [12., 13.]);
    }

    #[test]
    fn sizes_match_counts() {
        let counts = counts(vec![Layer::conv(4), Layer::dense(10).after(0)]);
        let param_gen = RandParamGen::default_uniform(StdRng::seed_from_u64(1)).unwrap();
        let params = Params::materialize(&counts, param_gen).unwrap();

        assert_eq!(params.weights.len(), 36 + 40);
        assert_eq!(params.biases.len(), 14);
        assert!(
            params
                .weights
                .iter()
                .chain(&params.biases)
                .all(|x| (-0.5..0.5).contains(x))
        );
    }

    #[test]
    fn exhausted() {
        let counts = counts(vec![Layer::dense(3), Layer::dense(2).after(0)]);
        let err = Params::materialize(&counts, ConstParamGen::new(1., 10)).unwrap_err();

        assert!(matches!(err, FahrenErr::ParamGenExhausted { .. }));
        assert_eq!(err.status(), Status::ProcessingFailed);
    }

    #[test]
    fn layers_exceed_totals() {
        let counts = ParamCounts {
            layers: vec![LayerParams {
                weights: 5,
                biases: 1,
            }],
            total_weights: 2,
            total_biases: 1,
        };

        let err = Params::materialize(&counts, ConstParamGen::zeros()).unwrap_err();

        assert!(matches!(
            err,
            FahrenErr::SizeMismatch {
                what: "weights",
                got: 2,
                expected: 5
            }
        ));
        assert_eq!(err.status(), Status::ProcessingFailed);
    }

    #[test]
    fn per_layer_stops_on_short_buffers() {
        let counts = counts(vec![Layer::dense(3), Layer::dense(2).after(0)]);
        let params = Params {
            weights: vec![0.; 4],
            biases: vec![0.; 5],
        };

        let slices: Vec<_> = params.per_layer(&counts).collect();

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].0.len(), 3);
    }

    #[test]
    fn allocation_failure() {
        let err = alloc("weights", usize::MAX).unwrap_err();

        assert!(matches!(err, FahrenErr::Allocation { len: usize::MAX, .. }));
        assert_eq!(err.status(), Status::ProcessingFailed);
    }
}
