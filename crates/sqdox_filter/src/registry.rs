//! Classes discovered in a file and the member functions attached to them.
//!
//! Squirrel defines members two ways: `function name()` inside the class
//! block, or `function Class::name()` (also `Class.name`) after it. The
//! registry keeps both sets per class so that a member is reported once.
//!
//! A class name declared twice gets two records. Lookups by name resolve to
//! the first declaration.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{FilterError, FilterResult};

/// Handle to a class record. Only valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    name: String,
    inside: Vec<String>,
    outside: Vec<String>,
}

impl ClassRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inside: Vec::new(),
            outside: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members defined inside the class block, in discovery order.
    pub fn members_inside(&self) -> &[String] {
        &self.inside
    }

    /// Members defined with the qualified syntax, in discovery order.
    pub fn members_outside(&self) -> &[String] {
        &self.outside
    }

    pub fn has_member(&self, function: &str) -> bool {
        self.inside.iter().any(|f| f == function) || self.outside.iter().any(|f| f == function)
    }
}

#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<ClassRecord>,
    first_by_name: HashMap<String, ClassId>,
    /// Class that receives in-body members; qualified definitions move it.
    active: Option<ClassId>,
    /// Class of the latest header; only `register_class` moves it.
    latest: Option<ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for `name` and make it the active class. A repeated
    /// name still gets its own record; lookups keep resolving to the first.
    pub fn register_class(&mut self, name: &str) -> ClassId {
        let id = ClassId(self.classes.len());
        self.classes.push(ClassRecord::new(name));
        if self.first_by_name.contains_key(name) {
            warn!(class = name, "class declared more than once; members resolve to the first declaration");
        } else {
            self.first_by_name.insert(name.to_string(), id);
        }
        self.active = Some(id);
        self.latest = Some(id);
        debug!(class = name, "registered class");
        id
    }

    /// First record registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.first_by_name.get(name).copied()
    }

    pub fn get(&self, id: ClassId) -> &ClassRecord {
        &self.classes[id.0]
    }

    /// Records in registration order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn active(&self) -> Option<&ClassRecord> {
        self.active.map(|id| self.get(id))
    }

    /// Class of the most recent header, regardless of qualified definitions
    /// seen since.
    pub fn latest(&self) -> Option<&ClassRecord> {
        self.latest.map(|id| self.get(id))
    }

    /// Resolve `class` and make it the active class.
    pub fn activate(&mut self, class: &str) -> FilterResult<ClassId> {
        let id = self.lookup(class).ok_or_else(|| FilterError::UnknownClass {
            class: class.to_string(),
        })?;
        self.active = Some(id);
        Ok(id)
    }

    /// Add an in-body member to the active class. Returns whether it was new.
    pub fn record_member_inside(&mut self, function: &str) -> bool {
        let Some(id) = self.active else {
            debug!(function, "in-body member without an active class");
            return false;
        };
        let record = &mut self.classes[id.0];
        if record.has_member(function) {
            return false;
        }
        record.inside.push(function.to_string());
        debug!(class = %record.name, function, "in-body member");
        true
    }

    /// Add an out-of-body member to the first class named `class`.
    ///
    /// Returns `Ok(true)` when the member was new, which means its parameter
    /// list should be typed; `Ok(false)` when the class already knew it.
    /// An undeclared class is an error.
    pub fn record_member_outside(&mut self, class: &str, function: &str) -> FilterResult<bool> {
        let id = self.activate(class)?;
        let record = &mut self.classes[id.0];
        if record.has_member(function) {
            return Ok(false);
        }
        record.outside.push(function.to_string());
        debug!(class, function, "out-of-body member");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_declarations_resolve_to_first() {
        let mut registry = ClassRegistry::new();
        let first = registry.register_class("Foo");
        let second = registry.register_class("Foo");
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("Foo"), Some(first));

        assert!(registry.record_member_outside("Foo", "bar").unwrap());
        assert_eq!(registry.get(first).members_outside(), ["bar"]);
        assert!(registry.get(second).members_outside().is_empty());
    }

    #[test]
    fn inside_members_go_to_active_class() {
        let mut registry = ClassRegistry::new();
        registry.register_class("A");
        let b = registry.register_class("B");
        assert!(registry.record_member_inside("run"));
        assert!(!registry.record_member_inside("run"));
        assert_eq!(registry.get(b).members_inside(), ["run"]);
        assert_eq!(registry.active().map(ClassRecord::name), Some("B"));
    }

    #[test]
    fn inside_member_without_class_is_dropped() {
        let mut registry = ClassRegistry::new();
        assert!(!registry.record_member_inside("orphan"));
        assert!(registry.is_empty());
    }

    #[test]
    fn outside_member_is_idempotent_across_both_sets() {
        let mut registry = ClassRegistry::new();
        let id = registry.register_class("Foo");
        registry.record_member_inside("draw");

        assert!(!registry.record_member_outside("Foo", "draw").unwrap());
        assert!(registry.record_member_outside("Foo", "load").unwrap());
        assert!(!registry.record_member_outside("Foo", "load").unwrap());

        let record = registry.get(id);
        assert_eq!(record.members_inside(), ["draw"]);
        assert_eq!(record.members_outside(), ["load"]);
    }

    #[test]
    fn unknown_class_is_an_error() {
        let mut registry = ClassRegistry::new();
        registry.register_class("Foo");
        let err = registry.record_member_outside("Bar", "baz").unwrap_err();
        assert!(
            matches!(&err, FilterError::UnknownClass { class } if class == "Bar"),
            "{err}"
        );
    }

    #[test]
    fn outside_member_switches_active_class() {
        let mut registry = ClassRegistry::new();
        registry.register_class("Foo");
        registry.register_class("Bar");
        registry.record_member_outside("Foo", "x").unwrap();
        assert_eq!(registry.active().map(ClassRecord::name), Some("Foo"));
        assert_eq!(registry.latest().map(ClassRecord::name), Some("Bar"));
    }

    #[test]
    fn iteration_keeps_registration_order() {
        let mut registry = ClassRegistry::new();
        registry.register_class("B");
        registry.register_class("A");
        registry.register_class("B");
        let names: Vec<_> = registry.iter().map(ClassRecord::name).collect();
        assert_eq!(names, ["B", "A", "B"]);
    }
}
