//! Registries described as data.
//!
//! A [`ParserDecl`] is the serde form of a parser: the same flags, options
//! and positionals the `add_*` calls register, with value kinds written as
//! text (`"int"`, `"map<string>"`).
//!
//! ```
//! use argbind::decl::{ArgDecl, ParserDecl, SwitchDecl};
//!
//! let decl = ParserDecl {
//!     name: Some("tac".into()),
//!     args: vec![ArgDecl::Option(SwitchDecl {
//!         names: "s,separator".into(),
//!         ..SwitchDecl::default()
//!     })],
//!     ..ParserDecl::default()
//! };
//! let mut parser = decl.build().unwrap();
//! parser.parse(["tac", "--separator=,"]).unwrap();
//! assert_eq!(parser["s"].get::<String>().unwrap(), ",");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::error::{SetupError, SetupResult};
use crate::names;
use crate::parser::{Parser, ParserConfig};
use crate::spec::{DEFAULT_DELIMITER, Spec};
use crate::value::{Scalar, ScalarKind, Value, ValueKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub config: ParserConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ArgDecl {
    Flag(SwitchDecl),
    AliasFlag(AliasDecl),
    Option(SwitchDecl),
    Positional(PositionalDecl),
}

/// A flag or an option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SwitchDecl {
    pub names: String,
    /// Defaults to `bool` for flags and `string` for options.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<RawDefault>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AliasDecl {
    pub names: String,
    pub target: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PositionalDecl {
    pub name: String,
    /// Defaults to `list<string>`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<RawDefault>,
}

/// A default written as the raw text the command line would carry.
///
/// JSON scalars are accepted as well, so `"default": 3` and
/// `"default": "3"` mean the same thing. Containers take an array with one
/// entry per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDefault {
    One(RawScalar),
    Many(Vec<RawScalar>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    fn to_raw(&self) -> String {
        match self {
            Self::Bool(b) => Scalar::Bool(*b).to_string(),
            Self::Int(n) => Scalar::Int(*n).to_string(),
            Self::Float(x) => Scalar::Float(*x).to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl RawDefault {
    fn raws(&self) -> Vec<String> {
        match self {
            Self::One(one) => vec![one.to_raw()],
            Self::Many(many) => many.iter().map(RawScalar::to_raw).collect(),
        }
    }
}

impl ParserDecl {
    pub fn build(&self) -> SetupResult<Parser> {
        let mut parser = Parser::with_config(self.config.clone());
        if let Some(name) = &self.name {
            parser.set_program_name(name.clone());
        }
        parser.set_description(self.description.clone());
        for arg in &self.args {
            arg.register(&mut parser)?;
        }
        tracing::debug!(args = self.args.len(), "built parser from declaration");
        Ok(parser)
    }
}

impl ArgDecl {
    fn register(&self, parser: &mut Parser) -> SetupResult<()> {
        match self {
            Self::Flag(decl) => {
                let kind = decl.kind.unwrap_or(ValueKind::BOOL);
                if !kind.is_flag_kind() {
                    return Err(SetupError::InvalidFlagKind(kind));
                }
                let set = names::parse_names(&decl.names, true)?;
                let spec = parser.push_spec(Spec::flag(set, kind, fresh_cell(kind)))?;
                configure(spec, &decl.help, &decl.value_help, None, decl.default.as_ref())
            }
            Self::Option(decl) => {
                let kind = decl.kind.unwrap_or(ValueKind::STRING);
                let set = names::parse_names(&decl.names, false)?;
                let spec = parser.push_spec(Spec::option(set, kind, fresh_cell(kind)))?;
                configure(
                    spec,
                    &decl.help,
                    &decl.value_help,
                    decl.delimiter,
                    decl.default.as_ref(),
                )
            }
            Self::Positional(decl) => {
                let kind = decl.kind.unwrap_or(ValueKind::List(ScalarKind::Str));
                let name = names::parse_positional_name(&decl.name)?;
                let spec = parser.push_spec(Spec::positional(name, kind, fresh_cell(kind)))?;
                configure(
                    spec,
                    &decl.help,
                    &decl.value_help,
                    decl.delimiter,
                    decl.default.as_ref(),
                )
            }
            Self::AliasFlag(decl) => {
                let registered = parser.add_alias_flag(&decl.names, &decl.target, &decl.value)?;
                if !decl.help.is_empty() {
                    registered.help(decl.help.clone());
                }
                Ok(())
            }
        }
    }
}

fn fresh_cell(kind: ValueKind) -> Rc<RefCell<Value>> {
    Rc::new(RefCell::new(kind.zero()))
}

fn configure(
    spec: &mut Spec,
    help: &str,
    value_help: &str,
    delimiter: Option<char>,
    default: Option<&RawDefault>,
) -> SetupResult<()> {
    spec.set_help(help.to_string());
    spec.set_value_help(value_help.to_string());
    if let Some(delimiter) = delimiter {
        spec.set_delimiter(delimiter);
    }
    if let Some(default) = default {
        let delimiter = spec.delimiter().unwrap_or(DEFAULT_DELIMITER);
        let value = coerce::build_default(spec.value_kind(), &default.raws(), delimiter)
            .map_err(|source| SetupError::InvalidDefault {
                name: spec.display_name(),
                source,
            })?;
        spec.store_default(value);
    }
    Ok(())
}
