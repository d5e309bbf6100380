use crate::error::{NoteoError, Result};

/// A value loaded at most once.
///
/// A failed load is remembered: every later access returns the same error
/// instead of retrying.
#[derive(Debug, Default)]
pub enum Lazy<T> {
    #[default]
    Unloaded,
    Loaded(T),
    Failed(NoteoError),
}

impl<T> Lazy<T> {
    pub fn get_or_load<F>(&mut self, load: F) -> Result<&mut T>
    where
        F: FnOnce() -> Result<T>,
    {
        if matches!(self, Lazy::Unloaded) {
            *self = match load() {
                Ok(value) => Lazy::Loaded(value),
                Err(err) => Lazy::Failed(err),
            };
        }
        match self {
            Lazy::Loaded(value) => Ok(value),
            Lazy::Failed(err) => Err(err.clone()),
            Lazy::Unloaded => unreachable!("lazy value was just loaded"),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Lazy::Loaded(_))
    }
}
