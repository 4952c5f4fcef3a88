//! Introspection Commands.
//!
//! Every class can register two generic commands:
//! 1. **`info`:** Static information about an object ("Information about ...").
//! 2. **`status`:** Dynamic state of an object ("Status of ...").
//!
//! Both callbacks return a list of titled sections of key/value pairs, which
//! `run_command` renders as aligned text.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::debug;

use super::Host;
use super::attr::AttrValue;
use super::object::ConfObject;
use crate::common::error::SimError;

/// A titled group of key/value pairs.
pub type InfoSection = (String, Vec<(String, AttrValue)>);

/// Callback producing the sections for one object.
pub type InfoCallback =
    Arc<dyn Fn(&dyn ConfObject) -> Result<Vec<InfoSection>, SimError> + Send + Sync>;

/// The two introspection commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandKind {
    /// `<obj>.info`
    Info,
    /// `<obj>.status`
    Status,
}

impl CommandKind {
    /// Returns the command's name on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Status => "status",
        }
    }

    /// Parses a command name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "info" => Some(Self::Info),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    const fn header(self) -> &'static str {
        match self {
            Self::Info => "Information about",
            Self::Status => "Status of",
        }
    }
}

/// Per-class command callbacks.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    callbacks: BTreeMap<(String, CommandKind), InfoCallback>,
}

impl CommandRegistry {
    /// Returns whether `class` has the command `kind`.
    pub fn has(&self, class: &str, kind: CommandKind) -> bool {
        self.callbacks.contains_key(&(class.to_owned(), kind))
    }

    /// Returns the callback of `kind` for `class`.
    pub fn get(&self, class: &str, kind: CommandKind) -> Option<&InfoCallback> {
        self.callbacks.get(&(class.to_owned(), kind))
    }

    fn insert(&mut self, class: &str, kind: CommandKind, callback: InfoCallback) {
        if self
            .callbacks
            .insert((class.to_owned(), kind), callback)
            .is_some()
        {
            debug!(class, command = kind.name(), "command replaced");
        }
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.callbacks.keys().map(|(c, k)| format!("{c}.{}", k.name())))
            .finish()
    }
}

impl Host {
    /// Registers the `info` command for `class`.
    pub fn new_info_command<F>(&mut self, class: &str, get_info: F)
    where
        F: Fn(&dyn ConfObject) -> Result<Vec<InfoSection>, SimError> + Send + Sync + 'static,
    {
        self.commands.insert(class, CommandKind::Info, Arc::new(get_info));
    }

    /// Registers the `status` command for `class`.
    pub fn new_status_command<F>(&mut self, class: &str, get_status: F)
    where
        F: Fn(&dyn ConfObject) -> Result<Vec<InfoSection>, SimError> + Send + Sync + 'static,
    {
        self.commands.insert(class, CommandKind::Status, Arc::new(get_status));
    }

    /// Runs the callback of `kind` on object `obj` and returns its raw sections.
    pub fn command_sections(&self, obj: &str, kind: CommandKind) -> Result<Vec<InfoSection>, SimError> {
        let object = self.get_object(obj)?;
        let callback = self.commands.get(object.class_name(), kind).ok_or_else(|| {
            SimError::General(format!(
                "class '{}' has no '{}' command",
                object.class_name(),
                kind.name()
            ))
        })?;
        callback(object)
    }

    /// Executes a command line of the form `"<object>.<command>"`.
    ///
    /// Every failure (unknown object, unknown command, missing command for the
    /// class, callback error) is reported as [`SimError::General`].
    pub fn run_command(&self, line: &str) -> Result<String, SimError> {
        let line = line.trim();
        let (obj, cmd) = line
            .rsplit_once('.')
            .ok_or_else(|| SimError::General(format!("unknown command '{line}'")))?;
        let kind = CommandKind::from_name(cmd)
            .ok_or_else(|| SimError::General(format!("unknown command '{cmd}'")))?;

        let object = self.get_object(obj).map_err(SimError::into_general)?;
        let sections = self
            .command_sections(obj, kind)
            .map_err(SimError::into_general)?;
        Ok(render(kind, object.name(), object.class_name(), &sections))
    }

    /// Checks that every class of each module in `modules` has both `info` and `status`.
    pub fn check_for_info_status(&self, modules: &[&str]) -> Result<(), SimError> {
        for module in modules {
            let classes = self
                .module_classes(module)
                .ok_or_else(|| SimError::General(format!("module '{module}' is not loaded")))?;
            for class in classes {
                for kind in [CommandKind::Info, CommandKind::Status] {
                    if !self.commands.has(class, kind) {
                        return Err(SimError::General(format!(
                            "class '{class}' in module '{module}' has no '{}' command",
                            kind.name()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Renders command output: a header, an `=` underline, then each section.
pub fn render(kind: CommandKind, name: &str, class: &str, sections: &[InfoSection]) -> String {
    let header = format!("{} {name} [class {class}]", kind.header());
    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "=".repeat(header.chars().count()));
    for (title, fields) in sections {
        let width = fields
            .iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0);
        let _ = write!(out, "\n{title}:\n");
        for (key, value) in fields {
            let _ = writeln!(out, "{key:>width$} : {value}");
        }
    }
    out
}
