use std::sync::Arc;

/// Dependencies shared by every option group saga step.
pub struct GroupSagaContext<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for GroupSagaContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ?Sized> GroupSagaContext<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
