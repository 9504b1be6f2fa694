//! Usage text.

use crate::names;
use crate::parser::Parser;
use crate::spec::{Spec, SpecKind};

const DEFAULT_VALUE_HELP: &str = "TEXT";

pub(crate) fn render(parser: &Parser) -> String {
    let specs = parser.specs();
    let (positionals, options): (Vec<&Spec>, Vec<&Spec>) =
        specs.iter().partition(|s| s.is_positional());

    let program = parser.program_name().unwrap_or("PROGRAM");
    let mut out = format!("Usage: {program}");
    if !options.is_empty() {
        out.push_str(" [OPTION]...");
    }
    for spec in &positionals {
        out.push(' ');
        out.push_str(&positional_left(spec));
    }
    out.push('\n');

    let description = parser.description().trim();
    if !description.is_empty() {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }

    if !positionals.is_empty() {
        out.push_str("\nArguments:\n");
        let rows: Vec<(String, String)> = positionals
            .iter()
            .map(|s| (positional_left(s), help_text(s)))
            .collect();
        push_rows(&mut out, rows);
    }

    if !options.is_empty() {
        out.push_str("\nOptions:\n");
        let rows: Vec<(String, String)> = options
            .iter()
            .map(|s| (switch_left(s), help_text(s)))
            .collect();
        push_rows(&mut out, rows);
    }

    out
}

fn push_rows(out: &mut String, rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {}\n", left));
        } else {
            out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
        }
    }
}

fn positional_left(spec: &Spec) -> String {
    let label = if spec.value_help().is_empty() {
        spec.display_name().to_uppercase()
    } else {
        spec.value_help().to_string()
    };
    if spec.value_kind().is_container() {
        format!("[{label}]...")
    } else {
        format!("<{label}>")
    }
}

fn switch_left(spec: &Spec) -> String {
    let mut left = spec
        .names()
        .iter()
        .map(|n| names::display_name(n))
        .collect::<Vec<_>>()
        .join(", ");
    if spec.kind() == SpecKind::Option {
        let value_help = match spec.value_help() {
            "" => DEFAULT_VALUE_HELP,
            other => other,
        };
        left.push_str(&format!(" <{value_help}>"));
    }
    left
}

fn help_text(spec: &Spec) -> String {
    let mut help = spec.help().trim().to_string();
    if help.is_empty() {
        if let Some((target, value)) = spec.alias_target() {
            help = format!("equivalent to {}={value}", names::display_name(target));
        }
    }

    let mut extras = Vec::new();
    if !spec.negated_names().is_empty() {
        let negated = spec
            .negated_names()
            .iter()
            .map(|n| names::display_name(n))
            .collect::<Vec<_>>()
            .join(", ");
        extras.push(format!("(negate: {negated})"));
    }
    if *spec.default_value() != spec.value_kind().zero() {
        extras.push(format!("[default: {}]", spec.default_value()));
    }

    for extra in extras {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&extra);
    }
    help
}
