//! Dynamically scoped variables
//!
//! A [`Dynamic`] holds a stack of bindings. Reads and writes always target
//! the innermost one. Bindings are pushed and popped by depth so that a
//! scope guard can pop its own binding, and anything left above it, on
//! every exit path.

use tracing::trace;

use crate::common::{Error, Result};

/// A variable whose visible value depends on the active binding scope
#[derive(Debug)]
pub struct Dynamic<T> {
    bindings: Vec<T>,
}

impl<T> Default for Dynamic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Dynamic<T> {
    /// Create an unbound variable
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Current innermost value
    pub fn get(&self) -> Result<&T> {
        self.bindings.last().ok_or(Error::UnboundVariable)
    }

    /// Replace the innermost value
    pub fn set(&mut self, value: T) -> Result<()> {
        let slot = self.bindings.last_mut().ok_or(Error::UnboundVariable)?;
        *slot = value;
        Ok(())
    }

    /// Number of live bindings
    pub fn depth(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Push a binding, returning the depth it lives at
    pub fn push(&mut self, value: T) -> usize {
        let depth = self.bindings.len();
        self.bindings.push(value);
        trace!(depth, "dynamic binding pushed");
        depth
    }

    /// Pop the binding pushed at `depth`, plus anything nested above it
    pub fn pop_to(&mut self, depth: usize) -> Option<T> {
        if self.bindings.len() <= depth {
            return None;
        }
        self.bindings.truncate(depth + 1);
        trace!(depth, "dynamic binding popped");
        self.bindings.pop()
    }

    /// Apply `f` to the binding at `depth` and to every binding above it
    pub fn update_from(&mut self, depth: usize, mut f: impl FnMut(&mut T)) -> Result<()> {
        let slots = self
            .bindings
            .get_mut(depth..)
            .filter(|slots| !slots.is_empty())
            .ok_or(Error::UnboundVariable)?;
        slots.iter_mut().for_each(|slot| f(slot));
        Ok(())
    }
}

impl<T: Copy> Dynamic<T> {
    /// Apply `f` to the innermost value
    pub fn update(&mut self, f: impl FnOnce(T) -> T) -> Result<()> {
        let current = *self.get()?;
        self.set(f(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_access_fails() {
        let mut var: Dynamic<i32> = Dynamic::new();
        assert!(matches!(var.get(), Err(Error::UnboundVariable)));
        assert!(matches!(var.set(1), Err(Error::UnboundVariable)));
        assert!(matches!(var.update(|v| v + 1), Err(Error::UnboundVariable)));
    }

    #[test]
    fn test_innermost_binding_is_visible() {
        let mut var = Dynamic::new();
        let outer = var.push(1);
        assert_eq!(*var.get().unwrap(), 1);

        let inner = var.push(2);
        var.set(3).unwrap();
        assert_eq!(*var.get().unwrap(), 3);
        assert_eq!(var.pop_to(inner), Some(3));

        assert_eq!(*var.get().unwrap(), 1);
        assert_eq!(var.pop_to(outer), Some(1));
        assert!(!var.is_bound());
    }

    #[test]
    fn test_pop_to_drops_bindings_left_above() {
        let mut var = Dynamic::new();
        let outer = var.push("outer");
        var.push("leaked");
        var.push("leaked too");

        assert_eq!(var.pop_to(outer), Some("outer"));
        assert_eq!(var.depth(), 0);
        assert_eq!(var.pop_to(outer), None);
    }

    #[test]
    fn test_update_from_reaches_nested_bindings() {
        let mut var = Dynamic::new();
        var.push(1);
        let middle = var.push(2);
        var.push(3);

        var.update_from(middle, |v| *v *= 10).unwrap();
        assert_eq!(var.pop_to(middle + 1), Some(30));
        assert_eq!(var.pop_to(middle), Some(20));
        assert_eq!(*var.get().unwrap(), 1);

        assert!(matches!(
            var.update_from(5, |v| *v = 0),
            Err(Error::UnboundVariable)
        ));
    }
}
