//! Circuit validation.

use tracing::warn;

use crate::components::ComponentKind;
use crate::error::{CircuitError, Result};

use super::types::TerminalRole;
use super::Circuit;

/// Validate a circuit before simulation.
///
/// Checks:
/// - The circuit has at least one component
/// - Every wire ends on existing terminals of two different components
/// - Partner links are mutual and join components of the same kind
///
/// Sources that can never drive anything and coils without a contact are
/// legal but logged.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let components = circuit.components();
    if components.is_empty() {
        return Err(CircuitError::topology("circuit has no components"));
    }

    for wire in circuit.wires() {
        for end in [wire.a, wire.b] {
            if components.terminal(end).is_none() {
                return Err(CircuitError::topology(format!(
                    "wire {} ends on missing terminal {}",
                    wire.id, end
                )));
            }
        }
        if wire.a.component == wire.b.component {
            return Err(CircuitError::SelfConnection {
                component: circuit.label(wire.a.component),
            });
        }
    }

    for component in components.iter() {
        if let Some(partner) = component.partner() {
            let mutual = components
                .get(partner)
                .map(|p| {
                    p.partner() == Some(component.id)
                        && std::mem::discriminant(p.kind())
                            == std::mem::discriminant(component.kind())
                })
                .unwrap_or(false);
            if !mutual {
                return Err(CircuitError::PartnerKindMismatch {
                    a: component.name.clone(),
                    b: circuit.label(partner),
                });
            }
        }

        match component.kind() {
            ComponentKind::RelayCoil(coil) if coil.linked_switch.is_none() => {
                warn!(component = %component.name, "relay coil has no linked contact");
            }
            _ if component.is_source()
                && !(component.has_role(TerminalRole::Source)
                    && component.has_role(TerminalRole::Ground)) =>
            {
                warn!(component = %component.name, "source lacks a live or ground terminal");
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;
    use crate::dsl;

    #[test]
    fn test_empty_circuit_rejected() {
        assert!(validate_circuit(&Circuit::new()).is_err());
    }

    #[test]
    fn test_valid_circuit() {
        let script = "BAT B1 on=1\nLAMP L1\nWIRE B1:pos L1:a\nWIRE L1:b B1:neg\n";
        let circuit = Circuit::from_ast(dsl::parse(script).unwrap()).unwrap();
        assert!(validate_circuit(&circuit).is_ok());
    }

    #[test]
    fn test_one_sided_partner_rejected() {
        let mut circuit =
            Circuit::from_ast(dsl::parse("SW S1\nSW S2\n.partner S1 S2").unwrap()).unwrap();
        let s2 = circuit.find("S2").unwrap();
        circuit.component_mut(s2).unwrap().set_partner(None);
        assert!(matches!(
            validate_circuit(&circuit),
            Err(CircuitError::PartnerKindMismatch { .. })
        ));
    }
}
