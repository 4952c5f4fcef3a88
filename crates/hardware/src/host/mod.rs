//! Virtual Platform Host.
//!
//! A small simulation host the CPU model plugs into. It provides:
//! 1. **Classes and Objects:** A class registry and named objects with attributes.
//! 2. **Configuration:** Atomic realisation of pre-configuration objects.
//! 3. **Commands:** Per-class `info`/`status` commands and `"<object>.<command>"` dispatch.
//! 4. **Modules:** The set of classes each loaded module registers.

/// Dynamically typed attribute values.
pub mod attr;

/// Per-class commands and command-line dispatch.
pub mod command;

/// Pre-configuration objects and configuration management.
pub mod conf;

/// The object and class model.
pub mod object;

use std::collections::BTreeMap;

pub use self::attr::AttrValue;
pub use self::command::{CommandKind, CommandRegistry, InfoSection};
pub use self::conf::{PreConfObject, pre_conf_object};
pub use self::object::{ConfClass, ConfObject};

/// The host session: classes, objects, commands, and loaded modules.
#[derive(Debug, Default)]
pub struct Host {
    classes: BTreeMap<String, ConfClass>,
    objects: BTreeMap<String, Box<dyn ConfObject>>,
    commands: CommandRegistry,
    modules: BTreeMap<String, Vec<String>>,
}

impl Host {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that module `module` provides `classes`.
    pub fn register_module(&mut self, module: &str, classes: &[&str]) {
        let entry = self.modules.entry(module.to_owned()).or_default();
        for class in classes {
            if !entry.iter().any(|c| c == class) {
                entry.push((*class).to_owned());
            }
        }
    }

    /// Returns the classes module `module` provides, or `None` if it is not loaded.
    pub fn module_classes(&self, module: &str) -> Option<&[String]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    /// Returns the command registry.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Returns the command registry for registering commands.
    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }
}
