use crate::value::Object;
use compact_str::CompactString;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// A scope in the chain of lexical scopes. Cloning produces another handle to the
/// same scope, which is how closures keep their defining scope alive.
#[derive(Clone, Default)]
pub struct SharedEnvironment {
    inner: Rc<RefCell<EnvironmentImpl>>,
}

#[derive(Default)]
struct EnvironmentImpl {
    values: HashMap<CompactString, Object>,
    parent: Option<SharedEnvironment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnboundName;

impl SharedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh scope whose misses fall through to `self`.
    pub fn new_enclosed(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let inner = self.inner.borrow();
        if let Some(value) = inner.values.get(name) {
            Some(value.clone())
        } else if let Some(ref parent) = inner.parent {
            parent.get(name)
        } else {
            None
        }
    }

    /// Binds `name` in this scope only, shadowing any outer binding.
    pub fn set(&self, name: &str, value: Object) {
        self.inner
            .borrow_mut()
            .values
            .insert(CompactString::from(name), value);
    }

    /// Rebinds `name` in the nearest scope that already holds it.
    pub fn assign(&self, name: &str, value: Object) -> Result<(), UnboundName> {
        let mut inner = self.inner.borrow_mut();
        if let Some(slot) = inner.values.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(ref parent) = inner.parent {
            parent.assign(name, value)
        } else {
            Err(UnboundName)
        }
    }
}

// Scopes can reach themselves through the closures they hold, so only the local names are printed.
impl std::fmt::Debug for SharedEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut names: Vec<&str> = inner.values.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("SharedEnvironment")
            .field("names", &names)
            .field("enclosed", &inner.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosed_scope_reads_through_to_parent() {
        let outer = SharedEnvironment::new();
        outer.set("x", Object::Integer(1));
        let inner = outer.new_enclosed();
        assert_eq!(inner.get("x"), Some(Object::Integer(1)));
        assert_eq!(inner.get("y"), None);
    }

    #[test]
    fn set_shadows_without_touching_parent() {
        let outer = SharedEnvironment::new();
        outer.set("x", Object::Integer(1));
        let inner = outer.new_enclosed();
        inner.set("x", Object::Integer(2));
        assert_eq!(inner.get("x"), Some(Object::Integer(2)));
        assert_eq!(outer.get("x"), Some(Object::Integer(1)));
    }

    #[test]
    fn assign_rebinds_in_defining_scope() {
        let outer = SharedEnvironment::new();
        outer.set("x", Object::Integer(1));
        let inner = outer.new_enclosed();
        assert_eq!(inner.assign("x", Object::Integer(5)), Ok(()));
        assert_eq!(outer.get("x"), Some(Object::Integer(5)));
        assert_eq!(inner.assign("missing", Object::NULL), Err(UnboundName));
    }
}
