//! Registry of named tests the user can pick from.
use crate::Result;
use std::fmt;

type Factory<T> = Box<dyn Fn() -> Result<Box<T>>>;

/// Ordered list of test constructors.
///
/// `T` is the test trait object of the frontend (e.g. `dyn Test`). Tests
/// are built on demand, each selection returns a fresh instance.
pub struct TestMenu<T: ?Sized> {
    tests: Vec<(String, Factory<T>)>,
}

impl<T: ?Sized> Default for TestMenu<T> {
    fn default() -> Self {
        Self { tests: Vec::new() }
    }
}

impl<T: ?Sized> fmt::Debug for TestMenu<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<T: ?Sized> TestMenu<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S, F>(&mut self, name: S, factory: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn() -> Result<Box<T>> + 'static,
    {
        let name = name.into();
        log::info!(target: "menu", "Registering test {}", name);
        self.tests.push((name, Box::new(factory)));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Build the test at `index`. Returns `None` if out of bounds.
    pub fn create(&self, index: usize) -> Option<Result<Box<T>>> {
        self.tests.get(index).map(|(name, factory)| {
            log::info!(target: "menu", "Starting test {}", name);
            factory()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TestMenu;
    use crate::Error;
    use std::{cell::Cell, rc::Rc};

    trait Named {
        fn name(&self) -> &'static str;
    }

    struct A;
    struct B;

    impl Named for A {
        fn name(&self) -> &'static str {
            "a"
        }
    }

    impl Named for B {
        fn name(&self) -> &'static str {
            "b"
        }
    }

    #[test]
    fn keeps_registration_order() {
        let mut menu = TestMenu::<dyn Named>::new();
        menu.register("Clear Color", || Ok(Box::new(A)))
            .register("Uniform Color", || Ok(Box::new(B)));
        let names: Vec<_> = menu.names().collect();
        assert_eq!(vec!["Clear Color", "Uniform Color"], names);
        assert_eq!(2, menu.len());
    }

    #[test]
    fn create_builds_the_selected_test() {
        let mut menu = TestMenu::<dyn Named>::new();
        menu.register("a", || Ok(Box::new(A)))
            .register("b", || Ok(Box::new(B)));
        assert_eq!("b", menu.create(1).unwrap().unwrap().name());
        assert_eq!("a", menu.create(0).unwrap().unwrap().name());
        assert!(menu.create(2).is_none());
    }

    #[test]
    fn every_selection_is_a_new_instance() {
        let built = Rc::new(Cell::new(0));
        let counter = built.clone();
        let mut menu = TestMenu::<dyn Named>::new();
        menu.register("a", move || {
            counter.set(counter.get() + 1);
            Ok(Box::new(A))
        });
        assert_eq!(0, built.get());
        let _ = menu.create(0);
        let _ = menu.create(0);
        assert_eq!(2, built.get());
    }

    #[test]
    fn factory_errors_are_returned() {
        let mut menu = TestMenu::<dyn Named>::new();
        menu.register("broken", || Err(Error::Allocation("program")));
        assert!(menu.create(0).unwrap().is_err());
    }
}
