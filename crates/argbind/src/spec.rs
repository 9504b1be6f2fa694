//! Registered arguments and how each kind reacts to a hit.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coerce;
use crate::error::{CoerceError, ValueError};
use crate::names::{self, NameSet};
use crate::value::{Bindable, Binding, Scalar, Value, ValueKind};

pub(crate) const DEFAULT_DELIMITER: char = '=';

/// What a registered argument is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Flag,
    AliasFlag,
    Option,
    Positional,
}

#[derive(Debug, Clone)]
pub(crate) enum Role {
    Flag {
        negated: Vec<String>,
    },
    AliasFlag {
        negated: Vec<String>,
        target: String,
        injected: String,
    },
    Option {
        delimiter: char,
    },
    Positional {
        delimiter: char,
    },
}

/// One registered flag, alias flag, option or positional.
///
/// The shape (names, kind, role) is fixed at registration. Only the value
/// slot and the hit counter change while parsing.
#[derive(Debug)]
pub struct Spec {
    names: Vec<String>,
    role: Role,
    kind: ValueKind,
    cell: Rc<RefCell<Value>>,
    default: Value,
    hits: u32,
    accepting: bool,
    help: String,
    value_help: String,
}

impl Spec {
    pub(crate) fn flag(set: NameSet, kind: ValueKind, cell: Rc<RefCell<Value>>) -> Self {
        Self::new(set.names, Role::Flag { negated: set.negated }, kind, cell)
    }

    pub(crate) fn alias_flag(
        set: NameSet,
        target: String,
        injected: String,
        cell: Rc<RefCell<Value>>,
    ) -> Self {
        let role = Role::AliasFlag {
            negated: set.negated,
            target,
            injected,
        };
        Self::new(set.names, role, ValueKind::BOOL, cell)
    }

    pub(crate) fn option(set: NameSet, kind: ValueKind, cell: Rc<RefCell<Value>>) -> Self {
        let role = Role::Option {
            delimiter: DEFAULT_DELIMITER,
        };
        Self::new(set.names, role, kind, cell)
    }

    pub(crate) fn positional(name: String, kind: ValueKind, cell: Rc<RefCell<Value>>) -> Self {
        let role = Role::Positional {
            delimiter: DEFAULT_DELIMITER,
        };
        Self::new(vec![name], role, kind, cell)
    }

    fn new(names: Vec<String>, role: Role, kind: ValueKind, cell: Rc<RefCell<Value>>) -> Self {
        let default = cell.borrow().clone();
        Self {
            names,
            role,
            kind,
            cell,
            default,
            hits: 0,
            accepting: true,
            help: String::new(),
            value_help: String::new(),
        }
    }

    pub fn kind(&self) -> SpecKind {
        match self.role {
            Role::Flag { .. } => SpecKind::Flag,
            Role::AliasFlag { .. } => SpecKind::AliasFlag,
            Role::Option { .. } => SpecKind::Option,
            Role::Positional { .. } => SpecKind::Positional,
        }
    }

    /// True for plain flags and alias flags.
    pub fn is_flag(&self) -> bool {
        matches!(self.role, Role::Flag { .. } | Role::AliasFlag { .. })
    }

    pub fn is_alias_flag(&self) -> bool {
        matches!(self.role, Role::AliasFlag { .. })
    }

    pub fn is_option(&self) -> bool {
        matches!(self.role, Role::Option { .. })
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.role, Role::Positional { .. })
    }

    /// Positive names, without dashes. A positional has exactly one.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn negated_names(&self) -> &[String] {
        match &self.role {
            Role::Flag { negated } | Role::AliasFlag { negated, .. } => negated,
            Role::Option { .. } | Role::Positional { .. } => &[],
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    /// Successful hits since registration or the last reset.
    pub fn count(&self) -> u32 {
        self.hits
    }

    pub fn value(&self) -> Value {
        self.cell.borrow().clone()
    }

    /// The value recorded as this slot's default.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Typed read of the current value.
    pub fn get<T: Bindable>(&self) -> Result<T, ValueError> {
        self.check_kind::<T>()?;
        Ok(T::from_value(&self.cell.borrow()).unwrap_or_default())
    }

    /// A typed handle sharing this spec's slot.
    pub fn binding<T: Bindable>(&self) -> Result<Binding<T>, ValueError> {
        self.check_kind::<T>()?;
        Ok(Binding::from_cell(Rc::clone(&self.cell)))
    }

    /// Store `value` and remember it as the value [`reset`](crate::Parser::reset)
    /// returns to.
    pub fn set_default<T: Bindable>(&mut self, value: T) -> Result<(), ValueError> {
        self.check_kind::<T>()?;
        self.store_default(value.into_value());
        Ok(())
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn value_help(&self) -> &str {
        &self.value_help
    }

    /// Delimiter used by `pair`, `list<pair>` and `map` kinds.
    pub fn delimiter(&self) -> Option<char> {
        match self.role {
            Role::Option { delimiter } | Role::Positional { delimiter } => Some(delimiter),
            Role::Flag { .. } | Role::AliasFlag { .. } => None,
        }
    }

    /// `(target option, injected value)` of an alias flag.
    pub fn alias_target(&self) -> Option<(&str, &str)> {
        match &self.role {
            Role::AliasFlag {
                target, injected, ..
            } => Some((target, injected)),
            _ => None,
        }
    }

    /// Whether `name` is one of this spec's positive or negated names.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name) || self.negated_names().iter().any(|n| n == name)
    }

    /// The way this argument is spelled in messages.
    pub fn display_name(&self) -> String {
        let first = self.names.first().map(String::as_str).unwrap_or_default();
        if self.is_positional() {
            first.to_string()
        } else {
            names::display_name(first)
        }
    }

    pub(crate) fn all_names(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .chain(self.negated_names().iter())
            .map(String::as_str)
    }

    pub(crate) fn role(&self) -> &Role {
        &self.role
    }

    pub(crate) fn takes_value(&self) -> bool {
        self.is_option()
    }

    pub(crate) fn set_help(&mut self, help: String) {
        self.help = help;
    }

    pub(crate) fn set_value_help(&mut self, value_help: String) {
        self.value_help = value_help;
    }

    pub(crate) fn set_delimiter(&mut self, delimiter: char) {
        match &mut self.role {
            Role::Option { delimiter: d } | Role::Positional { delimiter: d } => *d = delimiter,
            Role::Flag { .. } | Role::AliasFlag { .. } => {}
        }
    }

    pub(crate) fn store_default(&mut self, value: Value) {
        *self.cell.borrow_mut() = value.clone();
        self.default = value;
    }

    /// A flag occurrence under `name`.
    pub(crate) fn hit_flag(&mut self, name: &str) {
        let negated = self.negated_names().iter().any(|n| n == name);
        let mut slot = self.cell.borrow_mut();
        match &mut *slot {
            Value::Scalar(Scalar::Bool(b)) => *b = !negated,
            Value::Scalar(Scalar::Int(n)) => {
                *n = if negated {
                    n.saturating_sub(1)
                } else {
                    n.saturating_add(1)
                };
            }
            // Flag slots are bool or int from registration on.
            other => *other = Value::Scalar(Scalar::Bool(!negated)),
        }
        drop(slot);
        self.hits += 1;
        tracing::trace!(arg = %self.display_name(), hits = self.hits, "flag hit");
    }

    /// An option or positional occurrence carrying `raw`.
    pub(crate) fn hit_value(&mut self, raw: &str) -> Result<(), CoerceError> {
        let delimiter = self.delimiter().unwrap_or(DEFAULT_DELIMITER);
        coerce::apply(&mut self.cell.borrow_mut(), self.kind, raw, delimiter)?;
        self.hits += 1;
        if self.is_positional() && !self.kind.is_container() {
            self.accepting = false;
        }
        tracing::trace!(arg = %self.display_name(), raw, hits = self.hits, "value hit");
        Ok(())
    }

    /// A splitting positional passes on a token lacking its delimiter.
    pub(crate) fn cedes(&self, raw: &str) -> bool {
        let delimiter = self.delimiter().unwrap_or(DEFAULT_DELIMITER);
        self.kind.splits() && !raw.is_empty() && !raw.contains(delimiter)
    }

    pub(crate) fn still_accepting(&self) -> bool {
        self.accepting
    }

    pub(crate) fn stop_accepting(&mut self) {
        self.accepting = false;
    }

    pub(crate) fn begin_parse(&mut self) {
        self.accepting = true;
    }

    pub(crate) fn reset(&mut self) {
        *self.cell.borrow_mut() = self.default.clone();
        self.hits = 0;
        self.accepting = true;
    }

    fn check_kind<T: Bindable>(&self) -> Result<(), ValueError> {
        if T::KIND == self.kind {
            Ok(())
        } else {
            Err(ValueError {
                name: self.display_name(),
                actual: self.kind,
                requested: T::KIND,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::parse_names;

    fn cell(value: Value) -> Rc<RefCell<Value>> {
        Rc::new(RefCell::new(value))
    }

    #[test]
    fn int_flag_counts_both_ways() {
        let set = parse_names("v,!q", true).unwrap();
        let mut spec = Spec::flag(set, ValueKind::INT, cell(ValueKind::INT.zero()));
        for name in ["v", "v", "q", "v", "v"] {
            spec.hit_flag(name);
        }
        assert_eq!(spec.get::<i64>(), Ok(3));
        assert_eq!(spec.count(), 5);
    }

    #[test]
    fn bool_flag_follows_the_last_hit() {
        let set = parse_names("release,!debug", true).unwrap();
        let mut spec = Spec::flag(set, ValueKind::BOOL, cell(ValueKind::BOOL.zero()));
        spec.hit_flag("release");
        assert_eq!(spec.get::<bool>(), Ok(true));
        spec.hit_flag("debug");
        assert_eq!(spec.get::<bool>(), Ok(false));
    }

    #[test]
    fn failed_value_does_not_count() {
        let set = parse_names("n", false).unwrap();
        let mut spec = Spec::option(set, ValueKind::INT, cell(ValueKind::INT.zero()));
        assert!(spec.hit_value("x").is_err());
        assert_eq!(spec.count(), 0);
        spec.hit_value("5").unwrap();
        assert_eq!(spec.count(), 1);
    }

    #[test]
    fn scalar_positional_closes_after_one_value() {
        let mut spec = Spec::positional("file".into(), ValueKind::STRING, cell(ValueKind::STRING.zero()));
        assert!(spec.still_accepting());
        spec.hit_value("a.txt").unwrap();
        assert!(!spec.still_accepting());
        spec.begin_parse();
        assert!(spec.still_accepting());
    }

    #[test]
    fn splitting_kinds_cede_undelimited_tokens() {
        let kind: ValueKind = "map<string>".parse().unwrap();
        let spec = Spec::positional("env".into(), kind, cell(kind.zero()));
        assert!(spec.cedes("plain"));
        assert!(!spec.cedes("k=v"));

        let name = Spec::positional("name".into(), ValueKind::STRING, cell(ValueKind::STRING.zero()));
        assert!(!name.cedes("plain"));
    }

    #[test]
    fn typed_reads_check_the_kind() {
        let set = parse_names("o,output", false).unwrap();
        let spec = Spec::option(set, ValueKind::STRING, cell(ValueKind::STRING.zero()));
        let err = spec.get::<i64>().unwrap_err();
        assert_eq!(err.to_string(), "-o holds string, not int");
    }

    #[test]
    fn reset_returns_to_the_recorded_default() {
        let set = parse_names("E,!e", true).unwrap();
        let mut spec = Spec::flag(set, ValueKind::BOOL, cell(ValueKind::BOOL.zero()));
        spec.set_default(true).unwrap();
        spec.hit_flag("e");
        assert_eq!(spec.get::<bool>(), Ok(false));
        spec.reset();
        assert_eq!(spec.get::<bool>(), Ok(true));
        assert_eq!(spec.count(), 0);
    }
}
