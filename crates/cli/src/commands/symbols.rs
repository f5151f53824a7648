use anyhow::{Context, Result};
use boundary_core::analysis::BoundaryRunner;

use crate::commands::{with_backend, InputArgs};

/// List the subsystem functions the linked binary holds, with local positions.
pub fn symbols_command(inputs: &InputArgs, json: bool) -> Result<()> {
    let request = inputs.request()?;
    let linked = with_backend(inputs, |backend| {
        BoundaryRunner { backend }.reconcile(&request).context("Symbol reconciliation failed")
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&linked)?);
        return Ok(());
    }

    println!("Linked subsystem functions ({}):", linked.linked.len());
    if linked.linked.is_empty() {
        println!("  (none)");
    }
    for sym in &linked.linked {
        match linked.local_positions.get(sym) {
            Some(pos) => println!("  - {} [local #{pos}]", sym),
            None => println!("  - {}", sym),
        }
    }

    if !linked.unattributed.is_empty() {
        println!("Unattributed ({}):", linked.unattributed.len());
        for sym in &linked.unattributed {
            println!("  - {}", sym);
        }
    }

    Ok(())
}
