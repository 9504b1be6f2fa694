//! Ordered spec storage and name lookup.

use crate::error::{SetupError, SetupResult};
use crate::names;
use crate::spec::Spec;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    specs: Vec<Spec>,
}

impl Registry {
    /// Append `spec`, rejecting names another spec already owns.
    pub(crate) fn push(&mut self, spec: Spec) -> SetupResult<usize> {
        for name in spec.all_names() {
            if self.specs.iter().any(|existing| existing.matches(name)) {
                let name = if spec.is_positional() {
                    name.to_string()
                } else {
                    names::display_name(name)
                };
                return Err(SetupError::DuplicateName { name });
            }
        }
        self.specs.push(spec);
        Ok(self.specs.len() - 1)
    }

    pub(crate) fn specs(&self) -> &[Spec] {
        &self.specs
    }

    pub(crate) fn spec(&self, idx: usize) -> &Spec {
        &self.specs[idx]
    }

    pub(crate) fn spec_mut(&mut self, idx: usize) -> &mut Spec {
        &mut self.specs[idx]
    }

    /// Any spec owning `name`, positive or negated.
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.matches(name))
    }

    /// A flag or option reachable from the command line as `name`.
    pub(crate) fn find_switch(&self, name: &str) -> Option<usize> {
        self.specs
            .iter()
            .position(|s| !s.is_positional() && s.matches(name))
    }

    /// The option an alias flag re-fires.
    pub(crate) fn find_option(&self, name: &str) -> Option<usize> {
        self.specs
            .iter()
            .position(|s| s.is_option() && s.names().iter().any(|n| n == name))
    }

    /// First positional at or after `from` that still takes values.
    pub(crate) fn next_positional(&self, from: usize) -> Option<usize> {
        self.specs
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, s)| s.is_positional() && s.still_accepting())
            .map(|(idx, _)| idx)
    }

    pub(crate) fn begin_parse(&mut self) {
        for spec in &mut self.specs {
            spec.begin_parse();
        }
    }

    pub(crate) fn reset(&mut self) {
        for spec in &mut self.specs {
            spec.reset();
        }
    }
}
