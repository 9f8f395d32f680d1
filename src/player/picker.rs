/// Source of queue positions for shuffled `next`.
pub trait IndexPicker: Send {
    /// Return an index in `0..len`. Only called with `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random picks from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::random_range(0..len)
    }
}
