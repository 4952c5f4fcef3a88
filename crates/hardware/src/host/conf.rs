//! Configuration Management.
//!
//! Objects are described first as `PreConfObject`s (a class, an optional name, and
//! initial attribute values) and then realised together by `add_configuration`.
//! Realisation is all-or-nothing: if any object fails, none is added.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::Host;
use super::attr::AttrValue;
use super::object::{ConfClass, ConfObject};
use crate::common::error::SimError;

/// An object description that has not been realised yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PreConfObject {
    /// Requested name; an unnamed object gets `<class><n>`.
    pub name: Option<String>,
    /// Class to instantiate.
    pub class: String,
    /// Attribute values applied before `finalize`.
    pub attrs: BTreeMap<String, AttrValue>,
}

impl PreConfObject {
    /// Sets an initial attribute value.
    #[must_use]
    pub fn with_attr(mut self, attr: &str, value: impl Into<AttrValue>) -> Self {
        let _ = self.attrs.insert(attr.to_owned(), value.into());
        self
    }
}

/// Describes an object of `class`, named `name` or auto-named when `None`.
pub fn pre_conf_object(name: Option<&str>, class: &str) -> PreConfObject {
    PreConfObject {
        name: name.map(str::to_owned),
        class: class.to_owned(),
        attrs: BTreeMap::new(),
    }
}

impl Host {
    /// Registers a class. Fails if a class with the same name exists.
    pub fn register_class(&mut self, class: ConfClass) -> Result<(), SimError> {
        if self.classes.contains_key(&class.name) {
            return Err(SimError::General(format!(
                "class '{}' is already registered",
                class.name
            )));
        }
        debug!(class = %class.name, "class registered");
        let _ = self.classes.insert(class.name.clone(), class);
        Ok(())
    }

    /// Returns a registered class.
    pub fn get_class(&self, name: &str) -> Option<&ConfClass> {
        self.classes.get(name)
    }

    /// Realises `objects` into the configuration.
    ///
    /// Names are checked for clashes with existing objects and within the batch, classes
    /// must be registered, and every initial attribute must be accepted. If any check
    /// fails nothing is added. Otherwise every object is finalized, then every object
    /// receives `objects_finalized`.
    ///
    /// # Returns
    ///
    /// The names of the realised objects, in input order.
    pub fn add_configuration(&mut self, objects: Vec<PreConfObject>) -> Result<Vec<String>, SimError> {
        let mut taken: BTreeSet<String> = self.objects.keys().cloned().collect();
        let mut named = Vec::with_capacity(objects.len());

        for pre in &objects {
            if !self.classes.contains_key(&pre.class) {
                return Err(SimError::Lookup(format!("no class named '{}'", pre.class)));
            }
            if let Some(name) = &pre.name {
                if !taken.insert(name.clone()) {
                    return Err(SimError::General(format!(
                        "an object called '{name}' already exists"
                    )));
                }
            }
        }
        for pre in &objects {
            let name = match &pre.name {
                Some(name) => name.clone(),
                None => unique_name(&pre.class, &mut taken),
            };
            named.push(name);
        }

        let mut realised = Vec::with_capacity(objects.len());
        for (pre, name) in objects.into_iter().zip(&named) {
            let class = self
                .classes
                .get(&pre.class)
                .ok_or_else(|| SimError::Lookup(format!("no class named '{}'", pre.class)))?;
            let mut obj = class.instantiate(name);
            for (attr, value) in pre.attrs {
                obj.set_attribute(&attr, value).map_err(|e| {
                    SimError::General(format!("failed to set '{name}.{attr}': {e}"))
                })?;
            }
            realised.push(obj);
        }

        for obj in &mut realised {
            obj.finalize();
        }
        for obj in &mut realised {
            obj.objects_finalized();
        }
        for obj in realised {
            info!(object = %obj.name(), class = %obj.class_name(), "object created");
            let _ = self.objects.insert(obj.name().to_owned(), obj);
        }
        Ok(named)
    }

    /// Returns the object called `name`.
    pub fn get_object(&self, name: &str) -> Result<&dyn ConfObject, SimError> {
        self.objects
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| no_object(name))
    }

    /// Returns the object called `name` for modification.
    pub fn get_object_mut(&mut self, name: &str) -> Result<&mut dyn ConfObject, SimError> {
        match self.objects.get_mut(name) {
            Some(obj) => Ok(obj.as_mut()),
            None => Err(no_object(name)),
        }
    }

    /// Returns the object called `name` as its concrete type.
    pub fn get_object_as<T: ConfObject>(&self, name: &str) -> Result<&T, SimError> {
        let obj = self.get_object(name)?;
        let class = obj.class_name().to_owned();
        obj.as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| SimError::Lookup(format!("object '{name}' of class '{class}' has another type")))
    }

    /// Returns the object called `name` as its concrete type, for modification.
    pub fn get_object_as_mut<T: ConfObject>(&mut self, name: &str) -> Result<&mut T, SimError> {
        let obj = self.get_object_mut(name)?;
        let class = obj.class_name().to_owned();
        obj.as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| SimError::Lookup(format!("object '{name}' of class '{class}' has another type")))
    }

    /// Removes the object called `name` from the configuration.
    pub fn delete_object(&mut self, name: &str) -> Result<(), SimError> {
        self.objects.remove(name).map(|_| ()).ok_or_else(|| no_object(name))?;
        info!(object = %name, "object deleted");
        Ok(())
    }

    /// Lists object names in sorted order.
    pub fn object_names(&self) -> Vec<&str> {
        self.objects.keys().map(String::as_str).collect()
    }

    /// Reads `attr` of object `obj`.
    pub fn get_attribute(&self, obj: &str, attr: &str) -> Result<AttrValue, SimError> {
        self.get_object(obj)?.get_attribute(attr)
    }

    /// Writes `attr` of object `obj`.
    pub fn set_attribute(&mut self, obj: &str, attr: &str, value: AttrValue) -> Result<(), SimError> {
        self.get_object_mut(obj)?.set_attribute(attr, value)
    }
}

fn no_object(name: &str) -> SimError {
    SimError::Lookup(format!("no object named '{name}'"))
}

/// Picks the lowest free `<class><n>` and reserves it.
fn unique_name(class: &str, taken: &mut BTreeSet<String>) -> String {
    let mut n = 0usize;
    loop {
        let candidate = format!("{class}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
