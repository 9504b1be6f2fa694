//! The registry facade: registration, parsing, lookup.

use std::ops::{Index, IndexMut};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dispatch::Dispatcher;
use crate::error::{ParseResult, SetupError, SetupResult, ValueError};
use crate::names;
use crate::registry::Registry;
use crate::spec::Spec;
use crate::usage;
use crate::value::{Bindable, Binding, FlagType, Value};

/// Parser-wide behavior switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParserConfig {
    /// An unknown option ends option scanning instead of failing: it and
    /// every token after it are dispatched as positionals. A bare `--` is
    /// kept as a positional in this mode too.
    pub unknown_option_as_positional: bool,
    /// Keep a bare `--` as the first positional instead of dropping it.
    pub keep_separator: bool,
}

impl ParserConfig {
    pub(crate) fn keeps_separator(&self) -> bool {
        self.keep_separator || self.unknown_option_as_positional
    }
}

/// A registry of flags, options and positionals.
///
/// ```
/// use argbind::Parser;
///
/// let mut parser = Parser::new();
/// let verbose = parser.add_flag::<i64>("v,verbose").unwrap().binding();
/// let output = parser.add_option::<String>("o,output").unwrap().binding();
/// parser.parse(["prog", "-vv", "-oout.txt"]).unwrap();
/// assert_eq!(verbose.get(), 2);
/// assert_eq!(output.get(), "out.txt");
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    registry: Registry,
    config: ParserConfig,
    program_name: Option<String>,
    description: String,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ParserConfig {
        &mut self.config
    }

    pub fn set_unknown_option_as_start_of_positionals(&mut self) -> &mut Self {
        self.config.unknown_option_as_positional = true;
        self
    }

    pub fn set_program_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.program_name = Some(name.into());
        self
    }

    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Register a `bool` (toggle) or `i64` (counter) flag.
    pub fn add_flag<T: FlagType>(&mut self, names: &str) -> SetupResult<Registered<'_, T>> {
        self.add_flag_with(names, Binding::default())
    }

    pub fn add_flag_with<T: FlagType>(
        &mut self,
        names: &str,
        binding: Binding<T>,
    ) -> SetupResult<Registered<'_, T>> {
        let set = names::parse_names(names, true)?;
        let idx = self.registry.push(Spec::flag(set, T::KIND, binding.cell()))?;
        Ok(self.registered(idx, binding))
    }

    /// Register a bool flag that also feeds `value` to the option `target`.
    ///
    /// `target` may be registered later; it is resolved when the flag fires.
    pub fn add_alias_flag(
        &mut self,
        names: &str,
        target: &str,
        value: &str,
    ) -> SetupResult<Registered<'_, bool>> {
        let set = names::parse_names(names, true)?;
        let binding = Binding::<bool>::default();
        let target = names::parse_names(target, false)?
            .names
            .into_iter()
            .next()
            .ok_or(SetupError::EmptyNameSpec)?;
        let spec = Spec::alias_flag(set, target, value.to_string(), binding.cell());
        let idx = self.registry.push(spec)?;
        Ok(self.registered(idx, binding))
    }

    pub fn add_option<T: Bindable>(&mut self, names: &str) -> SetupResult<Registered<'_, T>> {
        self.add_option_with(names, Binding::default())
    }

    pub fn add_option_with<T: Bindable>(
        &mut self,
        names: &str,
        binding: Binding<T>,
    ) -> SetupResult<Registered<'_, T>> {
        let set = names::parse_names(names, false)?;
        let idx = self.registry.push(Spec::option(set, T::KIND, binding.cell()))?;
        Ok(self.registered(idx, binding))
    }

    pub fn add_positional<T: Bindable>(&mut self, name: &str) -> SetupResult<Registered<'_, T>> {
        self.add_positional_with(name, Binding::default())
    }

    pub fn add_positional_with<T: Bindable>(
        &mut self,
        name: &str,
        binding: Binding<T>,
    ) -> SetupResult<Registered<'_, T>> {
        let name = names::parse_positional_name(name)?;
        let idx = self
            .registry
            .push(Spec::positional(name, T::KIND, binding.cell()))?;
        Ok(self.registered(idx, binding))
    }

    /// Untyped registration for declarations, whose kinds are only known at runtime.
    pub(crate) fn push_spec(&mut self, spec: Spec) -> SetupResult<&mut Spec> {
        let idx = self.registry.push(spec)?;
        Ok(self.registry.spec_mut(idx))
    }

    /// Scan `args` and update every matched spec.
    ///
    /// `args[0]` is the program name when it is non-empty and does not look
    /// like an option. The first error stops the scan. Effects applied before
    /// the error are kept.
    pub fn parse<I, S>(&mut self, args: I) -> ParseResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
        if let Some(first) = args.first() {
            if !first.is_empty() && !first.starts_with('-') {
                let first = args.remove(0);
                if self.program_name.is_none() {
                    let base = Path::new(&first)
                        .file_name()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| first.clone());
                    self.program_name = Some(base);
                }
            }
        }
        Dispatcher::new(&mut self.registry, &self.config, &args).run()
    }

    /// The spec owning `name` (without dashes), positive or negated.
    pub fn get(&self, name: &str) -> Option<&Spec> {
        self.registry.position(name).map(|idx| self.registry.spec(idx))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Spec> {
        let idx = self.registry.position(name)?;
        Some(self.registry.spec_mut(idx))
    }

    /// Typed read of the value registered as `name`.
    pub fn value_of<T: Bindable>(&self, name: &str) -> Option<Result<T, ValueError>> {
        self.get(name).map(Spec::get)
    }

    /// Specs in registration order.
    pub fn specs(&self) -> &[Spec] {
        self.registry.specs()
    }

    /// Current values keyed by each spec's first name, in registration order.
    pub fn values(&self) -> Vec<(&str, Value)> {
        self.registry
            .specs()
            .iter()
            .map(|spec| {
                let name = spec.names().first().map(String::as_str).unwrap_or_default();
                (name, spec.value())
            })
            .collect()
    }

    /// Restore every slot to its default and zero every hit count.
    pub fn reset(&mut self) {
        tracing::debug!("resetting registry");
        self.registry.reset();
    }

    pub fn usage(&self) -> String {
        usage::render(self)
    }

    fn registered<T: Bindable>(&mut self, idx: usize, binding: Binding<T>) -> Registered<'_, T> {
        Registered {
            spec: self.registry.spec_mut(idx),
            binding,
        }
    }
}

impl Index<&str> for Parser {
    type Output = Spec;

    fn index(&self, name: &str) -> &Spec {
        match self.get(name) {
            Some(spec) => spec,
            None => panic!("no argument named `{name}` is registered"),
        }
    }
}

impl IndexMut<&str> for Parser {
    fn index_mut(&mut self, name: &str) -> &mut Spec {
        match self.get_mut(name) {
            Some(spec) => spec,
            None => panic!("no argument named `{name}` is registered"),
        }
    }
}

/// Fluent handle returned by every `add_*` call.
pub struct Registered<'a, T> {
    spec: &'a mut Spec,
    binding: Binding<T>,
}

impl<'a, T: Bindable> Registered<'a, T> {
    pub fn help(self, help: impl Into<String>) -> Self {
        self.spec.set_help(help.into());
        self
    }

    /// Placeholder shown in usage, e.g. `FILE`.
    pub fn value_help(self, value_help: impl Into<String>) -> Self {
        self.spec.set_value_help(value_help.into());
        self
    }

    pub fn default_value(self, value: T) -> Self {
        self.spec.store_default(value.into_value());
        self
    }

    /// Split character for `pair`, `list<pair>` and `map` kinds. Ignored by flags.
    pub fn delimiter(self, delimiter: char) -> Self {
        self.spec.set_delimiter(delimiter);
        self
    }

    pub fn binding(&self) -> Binding<T> {
        self.binding.clone()
    }

    pub fn spec(&self) -> &Spec {
        &*self.spec
    }
}
