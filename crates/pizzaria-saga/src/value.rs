use std::any::Any;

/// A step output whose concrete type is only known to the step that made it.
///
/// Outputs are pushed onto the compensation stack and handed to the next step,
/// so they must be duplicable without knowing their type.
pub(crate) trait ErasedValue: Any + Send {
    fn duplicate(&self) -> Box<dyn ErasedValue>;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T> ErasedValue for T
where
    T: Clone + Send + 'static,
{
    fn duplicate(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}
