use anyhow::{anyhow, Context, Result};
use boundary_core::analysis::{BoundaryRunner, Category, Classification, Eviction};
use boundary_core::model::Symbol;
use serde::Serialize;

use crate::commands::{with_backend, InputArgs};

/// Everything known about one symbol after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolExplanation {
    pub symbol: Symbol,
    pub categories: Vec<Category>,
    pub linked: bool,
    pub local_position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eviction: Option<Eviction>,
}

/// Explain every known symbol called `name` (optionally only in `file`).
pub fn explain_symbols(
    classification: &Classification,
    name: &str,
    file: Option<&str>,
) -> Vec<SymbolExplanation> {
    classification
        .lookup(name, file)
        .into_iter()
        .map(|symbol| SymbolExplanation {
            symbol: symbol.clone(),
            categories: classification.categories_of(symbol),
            linked: classification.linked.contains(symbol),
            local_position: classification.linked.local_position(symbol),
            eviction: classification.evictions.get(symbol).cloned(),
        })
        .collect()
}

/// Classify in memory and report why `name` landed where it did.
pub fn explain_command(
    inputs: &InputArgs,
    name: &str,
    file: Option<&str>,
    json: bool,
) -> Result<()> {
    let request = inputs.request()?;
    let outcome = with_backend(inputs, |backend| {
        BoundaryRunner { backend }.run(&request).context("Classification failed")
    })?;

    let explanations = explain_symbols(&outcome.classification, name, file);
    if explanations.is_empty() {
        return Err(anyhow!("No function named {name} in metadata"));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&explanations)?);
        return Ok(());
    }

    for exp in explanations {
        let categories: Vec<&str> = exp.categories.iter().map(|c| c.as_str()).collect();
        println!("{}", exp.symbol);
        if categories.is_empty() {
            println!("  categories: (none; not a subsystem function)");
        } else {
            println!("  categories: {}", categories.join(", "));
        }
        println!("  in binary:  {}", if exp.linked { "yes" } else { "no" });
        if exp.local_position > 0 {
            println!("  sympos:     {}", exp.local_position);
        }
        if let Some(eviction) = exp.eviction {
            println!("  evicted in pass {} by caller {}", eviction.pass, eviction.caller);
        }
    }

    Ok(())
}
