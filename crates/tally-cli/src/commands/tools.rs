//! Tool boundary commands: list tools, call one with JSON arguments

use anyhow::{Context, Result};
use serde_json::Value;
use tally_core::{call_tool, list_tools};

use super::{print_json, Session};

pub fn cmd_tools_list(json: bool) -> Result<()> {
    let tools = list_tools();
    if json {
        return print_json(serde_json::to_value(&tools)?);
    }

    println!();
    println!("🧰 Available Tools ({})", tools.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for tool in &tools {
        let args: Vec<&str> = tool.input_schema["properties"]
            .as_object()
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default();
        println!("   {}", tool.name);
        println!("      {}", tool.description);
        if !args.is_empty() {
            println!("      args: {}", args.join(", "));
        }
    }
    Ok(())
}

/// Call a tool and print its response envelope
///
/// A failed tool call still prints the envelope, then exits non-zero.
pub fn cmd_call(session: &Session, name: &str, args: Option<&str>) -> Result<()> {
    let args: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("--args must be a JSON object")?,
        None => Value::Null,
    };

    let response = call_tool(
        &session.engine,
        &session.ledger,
        name,
        args,
        session.reference_date,
    );
    print_json(serde_json::to_value(&response)?)?;

    match response.error {
        Some(error) if !response.success => anyhow::bail!("Tool {} failed: {}", name, error),
        _ => Ok(()),
    }
}
