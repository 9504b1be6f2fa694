use argbind::{Parser, Spec, SpecKind, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// Parsed values keyed by each argument's first name, in registration order.
pub fn values(parser: &Parser) -> IndexMap<String, Value> {
    parser
        .values()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn values_text(parser: &Parser) -> String {
    let values = values(parser);
    let width = values.keys().map(|k| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in &values {
        out.push_str(&format!("{:width$} = {}\n", name, value, width = width));
    }
    out
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpecRow {
    pub name: String,
    pub kind: &'static str,
    #[serde(rename = "type")]
    pub value_kind: String,
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub negated: Vec<String>,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

pub fn spec_rows(parser: &Parser) -> Vec<SpecRow> {
    parser.specs().iter().map(spec_row).collect()
}

fn spec_row(spec: &Spec) -> SpecRow {
    let kind = match spec.kind() {
        SpecKind::Flag => "flag",
        SpecKind::AliasFlag => "alias-flag",
        SpecKind::Option => "option",
        SpecKind::Positional => "positional",
    };
    let alias = spec
        .alias_target()
        .map(|(target, value)| format!("{}={value}", argbind::names::display_name(target)));
    SpecRow {
        name: spec.display_name(),
        kind,
        value_kind: spec.value_kind().to_string(),
        names: spec.names().to_vec(),
        negated: spec.negated_names().to_vec(),
        default: spec.default_value().clone(),
        alias,
    }
}

pub fn spec_table(rows: &[SpecRow]) -> String {
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let mut line = format!(
            "{:width$}  {:kind_width$}  {}",
            row.name,
            row.kind,
            row.value_kind,
            width = width,
            kind_width = kind_width
        );
        if let Some(alias) = &row.alias {
            line.push_str(&format!("  -> {alias}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
