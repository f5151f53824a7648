use anyhow::{Context, Result};
use boundary_core::analysis::BoundaryRunner;
use boundary_core::config::OutputLayout;
use boundary_core::report::write_outputs;

use crate::commands::{with_backend, InputArgs};
use crate::{canonicalize_or_current, resolve_under};

/// Classify the subsystem and write every artifact to `out_dir`.
pub fn classify_command(inputs: &InputArgs, out_dir: Option<&str>, json: bool) -> Result<()> {
    let request = inputs.request()?;
    let outcome = with_backend(inputs, |backend| {
        BoundaryRunner { backend }.run(&request).context("Classification failed")
    })?;

    let root = canonicalize_or_current(&inputs.root)?;
    let layout = OutputLayout::new(resolve_under(&root, out_dir.unwrap_or(".")));
    write_outputs(&layout, &outcome.config, &outcome.classification)
        .with_context(|| format!("Failed to write outputs to {}", layout.root.display()))?;

    let summary = outcome.classification.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Boundary classification:");
    println!("  Functions:     {}", summary.functions);
    println!("  Interface:     {}", summary.interface);
    println!("  Fn pointers:   {}", summary.fn_ptr);
    println!("  Init:          {}", summary.init);
    println!("  Insiders:      {}", summary.insider);
    println!("  Outsiders:     {}", summary.outsider);
    println!("  Optimized out: {}", summary.optimized_out);
    println!("  Tainted:       {}", summary.tainted);
    println!("  Linked:        {}", summary.linked);
    if summary.unattributed > 0 {
        println!("  Unattributed:  {} (see warnings)", summary.unattributed);
    }
    println!("Outputs:");
    for path in layout.artifacts() {
        println!("  - {}", path.display());
    }

    Ok(())
}
