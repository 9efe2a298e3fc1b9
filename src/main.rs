//! circuitlab - switching circuit power checker
//!
//! Loads a netlist script, starts the simulation and reports which
//! components are powered, then applies switch and source actions in the
//! order given and reports again after each one.
//!
//! # Usage
//!
//! ```bash
//! circuitlab lamp.cir --toggle S1 --disable B1 -v
//! ```

use std::path::PathBuf;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing::Level;

use circuitlab_core::{
    circuit::{validate_circuit, Circuit},
    dsl,
    error::{CircuitError, Result},
    ResolveReport, Simulator, SimulatorConfig, Stability, DEFAULT_MAX_PASSES,
};

/// Switching circuit power checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist script
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Toggle a switch or source
    #[arg(long, value_name = "NAME")]
    toggle: Vec<String>,

    /// Turn a switch or source on
    #[arg(long, value_name = "NAME")]
    enable: Vec<String>,

    /// Turn a switch or source off
    #[arg(long, value_name = "NAME")]
    disable: Vec<String>,

    /// Pair matching switches and batteries of the 2D and 3D layers first
    #[arg(long)]
    link_layers: bool,

    /// Passes allowed for relay feedback to settle
    #[arg(long, default_value_t = DEFAULT_MAX_PASSES)]
    max_passes: usize,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Toggle,
    Enable,
    Disable,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Toggle => "toggle",
            Action::Enable => "enable",
            Action::Disable => "disable",
        }
    }
}

/// Actions in command-line order, regardless of which flag carried them.
fn ordered_actions(matches: &ArgMatches) -> Vec<(Action, String)> {
    let mut actions = Vec::new();
    for (id, action) in [
        ("toggle", Action::Toggle),
        ("enable", Action::Enable),
        ("disable", Action::Disable),
    ] {
        if let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<String>(id))
        {
            actions.extend(indices.zip(values).map(|(i, v)| (i, action, v.clone())));
        }
    }
    actions.sort_by_key(|(i, _, _)| *i);
    actions.into_iter().map(|(_, a, v)| (a, v)).collect()
}

fn print_state(simulator: &Simulator, step: &str, report: Option<&ResolveReport>) {
    match report {
        Some(r) => {
            let stability = match r.stability {
                Stability::Stable => "stable",
                Stability::Unstable => "UNSTABLE",
            };
            let truncated = if r.truncated { ", search truncated" } else { "" };
            println!("[{}] {} pass(es), {}{}", step, r.passes, stability, truncated);
        }
        None => println!("[{}] no change", step),
    }

    for component in simulator.circuit().components().iter() {
        let state = match component.enabled() {
            Some(true) => "on",
            Some(false) => "off",
            None => "",
        };
        println!(
            "  {:<12} {:<20} {:<4} {}",
            component.name,
            component.kind().name(),
            state,
            if component.is_powered() { "powered" } else { "-" }
        );
    }
}

fn main() -> Result<()> {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    // Parse and build the circuit
    let ast = dsl::parse_file(&args.script)?;
    let circuit = Circuit::from_ast(ast)?;
    validate_circuit(&circuit)?;

    let config = SimulatorConfig::new().with_max_passes(args.max_passes);
    let mut simulator = Simulator::with_config(circuit, config);

    if args.link_layers {
        let pairs = simulator.link_layers()?;
        println!("[link] {} component pair(s) matched", pairs.len());
    }

    let report = simulator.start();
    print_state(&simulator, "start", Some(&report));

    for (action, name) in ordered_actions(&matches) {
        let id = simulator
            .circuit()
            .find(&name)
            .ok_or_else(|| CircuitError::component_not_found(&name))?;
        let report = match action {
            Action::Toggle => simulator.toggle(id)?,
            Action::Enable => simulator.set_enabled(id, true)?,
            Action::Disable => simulator.set_enabled(id, false)?,
        };
        let step = format!("{} {}", action.label(), name);
        print_state(&simulator, &step, report.as_ref());
    }

    Ok(())
}
