//! Configuration Objects and Classes.
//!
//! This module defines the object model of the host. It provides:
//! 1. **Objects:** The `ConfObject` trait every realised object implements.
//! 2. **Classes:** `ConfClass`, a named factory that creates objects of one kind.
//! 3. **Downcasting:** `as_any`/`as_any_mut` to recover the concrete model type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::attr::AttrValue;
use crate::common::error::SimError;

/// An object living in the host configuration.
///
/// Implementors must be `Send` so a configuration can move between threads.
pub trait ConfObject: Any + Send {
    /// Returns the object's unique name (e.g., `"riscv_cpu0"`).
    fn name(&self) -> &str;

    /// Returns the name of the class the object belongs to.
    fn class_name(&self) -> &str;

    /// Reads an attribute.
    fn get_attribute(&self, attr: &str) -> Result<AttrValue, SimError>;

    /// Writes an attribute.
    fn set_attribute(&mut self, attr: &str, value: AttrValue) -> Result<(), SimError>;

    /// Lists the attribute names the class defines.
    fn attribute_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Called once after the object's attributes have been set.
    fn finalize(&mut self) {}

    /// Called once after every object in the same configuration has been finalized.
    fn objects_finalized(&mut self) {}

    /// Returns the object as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the object as mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn ConfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfObject")
            .field("name", &self.name())
            .field("class", &self.class_name())
            .finish()
    }
}

/// Creates an object of a class, given its name.
pub type ObjectFactory = Arc<dyn Fn(&str) -> Box<dyn ConfObject> + Send + Sync>;

/// A registered class.
#[derive(Clone)]
pub struct ConfClass {
    /// Class name (e.g., `"riscv_cpu"`).
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Object constructor.
    pub factory: ObjectFactory,
}

impl ConfClass {
    /// Creates a class description.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        factory: impl Fn(&str) -> Box<dyn ConfObject> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            factory: Arc::new(factory),
        }
    }

    /// Instantiates an object named `name`.
    pub fn instantiate(&self, name: &str) -> Box<dyn ConfObject> {
        (self.factory)(name)
    }
}

impl fmt::Debug for ConfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfClass")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
