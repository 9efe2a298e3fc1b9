//! User operations on switches and sources, and partner mirroring.
//!
//! A switch (or battery) may be paired with a counterpart, typically the
//! same part drawn on the other layer. Setting one sets both. The partner is
//! updated with mirroring turned off, so the pair never echoes back and
//! forth, and the whole operation resolves power exactly once.

use tracing::{debug, info};

use super::simulator::{CircuitEvent, ResolveReport, Simulator};
use crate::circuit::{match_layers, ComponentId, LayerPair};
use crate::components::ComponentKind;
use crate::error::{CircuitError, Result};

impl Simulator {
    /// Switch a component on or off, optionally mirroring to its partner.
    ///
    /// Returns `None` when nothing happened: not simulating, or the
    /// component is already in `on`. Components that are not switches or
    /// sources are rejected.
    pub fn set_state(
        &mut self,
        id: ComponentId,
        on: bool,
        notify_partner: bool,
    ) -> Result<Option<ResolveReport>> {
        let current = self.user_state(id)?;
        if !self.simulating || current == on {
            return Ok(None);
        }

        self.apply_state(id, on)?;

        if notify_partner {
            let partner = self
                .circuit
                .component(id)
                .and_then(|c| c.partner())
                .filter(|p| self.circuit.component(*p).is_some());
            if let Some(partner) = partner {
                debug!(
                    component = %self.circuit.label(id),
                    partner = %self.circuit.label(partner),
                    "mirroring state"
                );
                self.apply_state(partner, on)?;
            }
        }

        Ok(Some(self.resolve()))
    }

    /// Flip a switch or source, mirroring to its partner.
    pub fn toggle(&mut self, id: ComponentId) -> Result<Option<ResolveReport>> {
        let current = self.user_state(id)?;
        self.set_state(id, !current, true)
    }

    /// Turn a source (or switch) on or off, mirroring to its partner.
    pub fn set_enabled(&mut self, id: ComponentId, on: bool) -> Result<Option<ResolveReport>> {
        self.set_state(id, on, true)
    }

    /// Pair two switches or two batteries.
    pub fn link_partners(&mut self, a: ComponentId, b: ComponentId) -> Result<()> {
        self.circuit.pair_partners(a, b)
    }

    /// Check that the 2D and 3D layers describe the same circuit and, if they
    /// do, pair every matched switch and battery.
    ///
    /// Nothing is linked on mismatch.
    pub fn link_layers(&mut self) -> Result<Vec<LayerPair>> {
        let pairs = match_layers(&self.circuit)?;
        let mut linked = 0;
        for pair in &pairs {
            let pairable = match (
                self.circuit.component(pair.schematic).map(|c| c.kind()),
                self.circuit.component(pair.model).map(|c| c.kind()),
            ) {
                (Some(ComponentKind::Switch(_)), Some(ComponentKind::Switch(_)))
                | (Some(ComponentKind::Battery(_)), Some(ComponentKind::Battery(_))) => true,
                _ => false,
            };
            if pairable {
                self.circuit.pair_partners(pair.schematic, pair.model)?;
                linked += 1;
            }
        }
        info!(matched = pairs.len(), linked, "layers linked");
        Ok(pairs)
    }

    /// On/off state a user can change; errors for every other kind.
    fn user_state(&self, id: ComponentId) -> Result<bool> {
        let component = self
            .circuit
            .component(id)
            .ok_or_else(|| CircuitError::component_not_found(id))?;
        component
            .enabled()
            .ok_or_else(|| CircuitError::UnsupportedOperation {
                component: component.name.clone(),
                kind: component.kind().name(),
                action: "switched",
            })
    }

    fn apply_state(&mut self, id: ComponentId, on: bool) -> Result<()> {
        let component = self
            .circuit
            .component_mut(id)
            .ok_or_else(|| CircuitError::component_not_found(id))?;
        if component.set_enabled(on)? {
            self.events.push(CircuitEvent::StateChanged { component: id, on });
        }
        Ok(())
    }
}
