//! Getopt-style argument parsing into typed, bindable values.
//!
//! Register flags, options and positionals on a [`Parser`], then hand it
//! argv. Every registration owns one value slot shared with a [`Binding`],
//! so callers can either keep the binding or look the value up by name
//! after parsing.
//!
//! - short clusters: `-abc`, `-ovalue`, `-o value`
//! - long options: `--name`, `--name=value`, `--name value`
//! - negated flag names (`"r,!d"`) and counting flags (`-vvv`)
//! - alias flags that feed a fixed value to another option
//! - scalar, pair, list and map value kinds
//! - `--` ends option scanning
//!
//! ```
//! use argbind::Parser;
//!
//! let mut parser = Parser::new();
//! parser.add_flag::<bool>("n").unwrap();
//! parser.add_option::<Vec<String>>("f,file").unwrap();
//! parser.add_positional::<Vec<String>>("rest").unwrap();
//!
//! parser.parse(["prog", "-n", "-f", "a", "--file=b", "--", "-x"]).unwrap();
//! assert_eq!(parser["n"].get::<bool>(), Ok(true));
//! assert_eq!(parser["file"].get::<Vec<String>>().unwrap(), ["a", "b"]);
//! assert_eq!(parser["rest"].get::<Vec<String>>().unwrap(), ["-x"]);
//! ```

pub mod coerce;
pub mod decl;
mod dispatch;
pub mod error;
pub mod names;
mod parser;
mod registry;
mod spec;
mod usage;
pub mod value;

pub use error::{CoerceError, ParseError, ParseResult, SetupError, SetupResult, ValueError};
pub use parser::{Parser, ParserConfig, Registered};
pub use spec::{Spec, SpecKind};
pub use value::{Bindable, Binding, FlagType, ItemType, Scalar, ScalarKind, ScalarType, Value, ValueKind};
