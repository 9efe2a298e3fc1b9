//! In-memory catalog of components and their terminals.

use std::collections::{BTreeMap, HashMap};

use super::types::{ComponentId, Terminal, TerminalId};
use crate::components::{Component, ComponentKind};
use crate::error::{CircuitError, Result};

/// Owns every component of one circuit, indexed by id and by name.
///
/// Iteration is in id (creation) order.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<ComponentId, Component>,
    names: HashMap<String, ComponentId>,
    next_id: usize,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with its kind's terminal layout.
    pub fn insert(&mut self, name: &str, kind: ComponentKind) -> Result<ComponentId> {
        let terminals = kind.default_terminals();
        self.insert_with_terminals(name, kind, terminals)
    }

    /// Register a component with an explicit terminal list.
    pub fn insert_with_terminals(
        &mut self,
        name: &str,
        kind: ComponentKind,
        terminals: Vec<Terminal>,
    ) -> Result<ComponentId> {
        if self.names.contains_key(name) {
            return Err(CircuitError::DuplicateComponent {
                name: name.to_string(),
            });
        }
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.names.insert(name.to_string(), id);
        self.components
            .insert(id, Component::with_terminals(id, name, kind, terminals));
        Ok(id)
    }

    /// Remove a component. Terminals go with it.
    pub fn remove(&mut self, id: ComponentId) -> Option<Component> {
        let component = self.components.remove(&id)?;
        self.names.remove(&component.name);
        Some(component)
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(&id)
    }

    /// Like [`get`](Self::get) but reports a missing component as an error.
    pub fn require(&self, id: ComponentId) -> Result<&Component> {
        self.get(id).ok_or_else(|| CircuitError::component_not_found(id))
    }

    pub fn require_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.get_mut(id)
            .ok_or_else(|| CircuitError::component_not_found(id))
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Find a component id by name.
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Look up a terminal, if both the component and the slot still exist.
    pub fn terminal(&self, id: TerminalId) -> Option<&Terminal> {
        self.get(id.component)?.terminal(id.slot)
    }

    /// Resolve a `component:terminal` reference such as `B1:pos`.
    pub fn resolve_terminal(&self, reference: &str) -> Result<TerminalId> {
        let (component, terminal) =
            reference
                .split_once(':')
                .ok_or_else(|| CircuitError::TerminalNotFound {
                    terminal: reference.to_string(),
                })?;
        let id = self
            .find(component)
            .ok_or_else(|| CircuitError::component_not_found(component))?;
        let slot = self
            .components
            .get(&id)
            .and_then(|c| c.terminal_slot(terminal))
            .ok_or_else(|| CircuitError::TerminalNotFound {
                terminal: reference.to_string(),
            })?;
        Ok(TerminalId::new(id, slot))
    }

    /// Display label for a terminal, e.g. `B1:pos`.
    pub fn terminal_label(&self, id: TerminalId) -> String {
        match self.get(id.component) {
            Some(c) => match c.terminal(id.slot) {
                Some(t) => format!("{}:{}", c.name, t.name),
                None => format!("{}:#{}", c.name, id.slot),
            },
            None => id.to_string(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.components.values_mut()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Lamp};

    #[test]
    fn test_insert_and_lookup() {
        let mut reg = ComponentRegistry::new();
        let b = reg
            .insert("B1", ComponentKind::Battery(Battery::default()))
            .unwrap();
        let l = reg.insert("L1", ComponentKind::Lamp(Lamp::default())).unwrap();
        assert_ne!(b, l);
        assert_eq!(reg.find("L1"), Some(l));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.resolve_terminal("B1:neg").unwrap(), TerminalId::new(b, 1));
        assert_eq!(reg.terminal_label(TerminalId::new(b, 0)), "B1:pos");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = ComponentRegistry::new();
        reg.insert("L1", ComponentKind::Lamp(Lamp::default())).unwrap();
        let err = reg.insert("L1", ComponentKind::Lamp(Lamp::default()));
        assert!(matches!(err, Err(CircuitError::DuplicateComponent { .. })));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut reg = ComponentRegistry::new();
        let a = reg.insert("A", ComponentKind::Junction).unwrap();
        reg.remove(a).unwrap();
        let b = reg.insert("A", ComponentKind::Junction).unwrap();
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
    }

    #[test]
    fn test_bad_terminal_references() {
        let mut reg = ComponentRegistry::new();
        reg.insert("L1", ComponentKind::Lamp(Lamp::default())).unwrap();
        assert!(matches!(
            reg.resolve_terminal("L1"),
            Err(CircuitError::TerminalNotFound { .. })
        ));
        assert!(matches!(
            reg.resolve_terminal("L1:pos"),
            Err(CircuitError::TerminalNotFound { .. })
        ));
        assert!(matches!(
            reg.resolve_terminal("L9:a"),
            Err(CircuitError::ComponentNotFound { .. })
        ));
    }
}
