//! # Rendering Module
//!
//! Turns library results into text. Machine-readable output (serialized
//! instances, schemas) is JSON on stdout; listings meant for people use
//! `console` styling, which switches itself off when the stream is not a
//! terminal.

use anyhow::Result;
use console::style;
use modelcast::{CompoundError, DefinitionSet, ModelClass, Serialized};

/// JSON text, pretty-printed or on one line.
pub fn json(value: &serde_json::Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// A serialized instance as a JSON object, keeping attribute order.
pub fn serialized_json(serialized: Serialized) -> Result<serde_json::Value> {
    let mut object = serde_json::Map::new();
    for (name, value) in serialized {
        object.insert(name, value.to_json()?);
    }
    Ok(serde_json::Value::Object(object))
}

/// One line per model: name, attributes, and the parent when there is one.
pub fn model_list(definitions: &DefinitionSet) -> String {
    if definitions.is_empty() {
        return format!("{}\n", style("No models defined.").dim());
    }

    let width = definitions.names().map(str::len).max().unwrap_or(0);
    let mut out = String::new();
    for class in definitions.classes() {
        let name = class.model_name();
        let attributes: Vec<&str> = class.attribute_names().collect();
        out.push_str(&format!(
            "{}{}  {}",
            style(name).bold(),
            " ".repeat(width - name.len()),
            style(format!("[{}]", attributes.join(", "))).dim()
        ));
        if let Some(parent) = named_parent(class) {
            out.push_str(&format!(" {}", style(format!("< {parent}")).cyan()));
        }
        out.push('\n');
    }
    out
}

fn named_parent(class: &ModelClass) -> Option<&str> {
    class.parent().and_then(ModelClass::name)
}

/// Every failing path with its messages, for stderr.
pub fn error_listing(model: &str, errors: &CompoundError) -> String {
    let mut out = format!(
        "{} {}\n",
        style(model).for_stderr().bold(),
        style(format!("has {} invalid attribute(s):", errors.len())).for_stderr().red()
    );
    for (path, messages) in errors.errors() {
        for message in messages {
            out.push_str(&format!(
                "  {}: {}\n",
                style(path).for_stderr().yellow(),
                message
            ));
        }
    }
    out
}

/// Confirmation line for a document that passed validation.
pub fn valid(model: &str) -> String {
    format!("{} {}\n", style("✓").green(), style(format!("valid {model}")).bold())
}
