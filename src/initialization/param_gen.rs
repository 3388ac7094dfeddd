/// A `ParamGen` generates values for the initial state of the model's parameters.
pub trait ParamGen {
    /// Should fill at most `out.len()` parameters.
    ///
    /// # Arguments
    /// * `out` - The slice to write the generated values into.
    ///
    /// # Returns
    /// The amount of values written, less than `out.len()` if the generator got exhausted.
    fn fill(&mut self, out: &mut [f32]) -> usize;
}

impl<P: ParamGen + ?Sized> ParamGen for &mut P {
    fn fill(&mut self, out: &mut [f32]) -> usize {
        (**self).fill(out)
    }
}
