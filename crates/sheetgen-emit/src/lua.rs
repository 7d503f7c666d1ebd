//! Lua table emitter
//!
//! Produces a chunk of the form `return { ... }`:
//!
//! ```text
//! return {
//! {
//! 	["id"] = 1,
//! 	["tags"] = {
//! 		"a",
//! 	},
//! },
//! }
//! ```
//!
//! Each member of a table opened at depth `d` is indented by `d` tabs and
//! followed by `,\n`; the closing brace is indented by `d - 1` tabs.
//! Mapping entries are written in lexicographic byte order of their keys,
//! sequence elements in source order, so equal content always produces
//! identical bytes.

use std::collections::BTreeMap;

use sheetgen_core::{Record, Value};

/// Serialise a record sequence as a Lua chunk returning a table
pub fn to_string(records: &[Record]) -> String {
    let mut out = String::from("return ");
    write_sequence(&mut out, records, 0, |out, record, depth| {
        write_mapping(out, record, depth)
    });
    out
}

/// Append the Lua expression for `value` at nesting `depth`
pub fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&format_float(*n)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => write_sequence(out, items, depth, write_value),
        Value::Object(map) => write_mapping(out, map, depth),
    }
}

fn write_sequence<T, F>(out: &mut String, items: &[T], depth: usize, write_item: F)
where
    F: Fn(&mut String, &T, usize),
{
    out.push_str("{\n");
    for item in items {
        indent(out, depth);
        write_item(out, item, depth + 1);
        out.push_str(",\n");
    }
    indent(out, depth.saturating_sub(1));
    out.push('}');
}

/// `BTreeMap` iteration is already sorted by key bytes.
fn write_mapping(out: &mut String, map: &BTreeMap<String, Value>, depth: usize) {
    out.push_str("{\n");
    for (key, value) in map {
        indent(out, depth);
        out.push('[');
        write_string(out, key);
        out.push_str("] = ");
        write_value(out, value, depth + 1);
        out.push_str(",\n");
    }
    indent(out, depth.saturating_sub(1));
    out.push('}');
}

/// Strings are inlined verbatim between double quotes.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// General format: shortest round-trip digits, switching to exponent form
/// when the decimal exponent is below -4 or at least 6. The exponent is
/// signed and has at least two digits (`1e+06`, `1.5e-05`).
fn format_float(n: f64) -> String {
    let sci = format!("{:e}", n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };
    if n == 0.0 || (-4..6).contains(&exp) {
        return n.to_string();
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
}
