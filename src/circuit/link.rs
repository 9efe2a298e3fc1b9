//! Matching the 2D schematic against the 3D model.
//!
//! Both views of a circuit live in the same [`Circuit`]. Counterparts share a
//! `tag`. The views match when every tag appears exactly once per layer and
//! each pair sits in nets holding the same multiset of tags.

use std::collections::BTreeMap;

use super::graph::Circuit;
use super::types::{ComponentId, Layer};
use crate::error::{CircuitError, Result};

/// A schematic component and its model counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPair {
    pub schematic: ComponentId,
    pub model: ComponentId,
}

fn by_tag(circuit: &Circuit, layer: Layer) -> Result<BTreeMap<&str, ComponentId>> {
    let mut map = BTreeMap::new();
    for c in circuit.components().iter().filter(|c| c.layer == layer) {
        if map.insert(c.tag.as_str(), c.id).is_some() {
            return Err(CircuitError::link_mismatch(format!(
                "tag '{}' is used twice on the {} layer",
                c.tag, layer
            )));
        }
    }
    Ok(map)
}

fn net_tags(circuit: &Circuit, id: ComponentId) -> Vec<&str> {
    let mut tags: Vec<&str> = circuit
        .net_of(id)
        .into_iter()
        .filter_map(|m| circuit.component(m))
        .map(|c| c.tag.as_str())
        .collect();
    tags.sort_unstable();
    tags
}

/// Pair up schematic and model components, or explain why they differ.
pub fn match_layers(circuit: &Circuit) -> Result<Vec<LayerPair>> {
    let schematic = by_tag(circuit, Layer::Schematic)?;
    let model = by_tag(circuit, Layer::Model)?;

    if schematic.len() != model.len() {
        return Err(CircuitError::link_mismatch(format!(
            "component count differs: {} on 2d, {} on 3d",
            schematic.len(),
            model.len()
        )));
    }

    let mut pairs = Vec::with_capacity(schematic.len());
    for (tag, &s) in &schematic {
        let &m = model.get(tag).ok_or_else(|| {
            CircuitError::link_mismatch(format!("no 3d counterpart tagged '{}'", tag))
        })?;
        if net_tags(circuit, s) != net_tags(circuit, m) {
            return Err(CircuitError::link_mismatch(format!(
                "connections of '{}' differ between 2d and 3d",
                tag
            )));
        }
        pairs.push(LayerPair {
            schematic: s,
            model: m,
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentKind, Lamp, Switch};

    fn view(circuit: &mut Circuit, layer: Layer, suffix: &str, wired: bool) {
        let sw = circuit
            .add_component(&format!("S{}", suffix), ComponentKind::Switch(Switch::default()))
            .unwrap();
        let lamp = circuit
            .add_component(&format!("L{}", suffix), ComponentKind::Lamp(Lamp::default()))
            .unwrap();
        for (id, tag) in [(sw, "S"), (lamp, "L")] {
            circuit.set_tag(id, tag).unwrap();
            circuit.set_layer(id, layer).unwrap();
        }
        if wired {
            circuit
                .connect_named(&format!("S{}:b", suffix), &format!("L{}:a", suffix))
                .unwrap();
        }
    }

    #[test]
    fn test_matching_views() {
        let mut c = Circuit::new();
        view(&mut c, Layer::Schematic, "2", true);
        view(&mut c, Layer::Model, "3", true);
        let pairs = match_layers(&c).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&LayerPair {
            schematic: c.find("S2").unwrap(),
            model: c.find("S3").unwrap(),
        }));
    }

    #[test]
    fn test_both_isolated_match() {
        let mut c = Circuit::new();
        view(&mut c, Layer::Schematic, "2", false);
        view(&mut c, Layer::Model, "3", false);
        assert!(match_layers(&c).is_ok());
    }

    #[test]
    fn test_wiring_difference_fails() {
        let mut c = Circuit::new();
        view(&mut c, Layer::Schematic, "2", true);
        view(&mut c, Layer::Model, "3", false);
        assert!(matches!(
            match_layers(&c),
            Err(CircuitError::LinkMismatch { .. })
        ));
    }

    #[test]
    fn test_count_difference_fails() {
        let mut c = Circuit::new();
        view(&mut c, Layer::Schematic, "2", false);
        c.add_component("X", ComponentKind::Junction).unwrap();
        view(&mut c, Layer::Model, "3", false);
        assert!(match_layers(&c).is_err());
    }
}
