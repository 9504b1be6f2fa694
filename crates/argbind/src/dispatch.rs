//! The left-to-right argv scan.
//!
//! Two cursors move through the scan: `cursor` over the input tokens and
//! `spec_cursor` over the registered positionals. A splitting positional that
//! cedes a token advances only the spec cursor, so the same token is offered
//! to the next positional.

use crate::error::{ParseError, ParseResult};
use crate::names;
use crate::parser::ParserConfig;
use crate::registry::Registry;
use crate::spec::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Separator,
    /// Body after the single dash.
    Short(&'a str),
    /// Body after the double dash.
    Long(&'a str),
    Positional,
}

fn classify(token: &str) -> Token<'_> {
    if token == "--" {
        return Token::Separator;
    }
    if let Some(body) = token.strip_prefix("--") {
        if !body.is_empty() && !body.starts_with('-') {
            return Token::Long(body);
        }
        return Token::Positional;
    }
    if let Some(body) = token.strip_prefix('-') {
        if !body.is_empty() {
            return Token::Short(body);
        }
    }
    Token::Positional
}

enum Step {
    /// Continue scanning at this input index.
    Next(usize),
    /// This token and everything after it are positionals.
    StartPositionals,
}

pub(crate) struct Dispatcher<'p> {
    registry: &'p mut Registry,
    config: &'p ParserConfig,
    args: &'p [String],
    spec_cursor: usize,
}

impl<'p> Dispatcher<'p> {
    pub(crate) fn new(registry: &'p mut Registry, config: &'p ParserConfig, args: &'p [String]) -> Self {
        Self {
            registry,
            config,
            args,
            spec_cursor: 0,
        }
    }

    pub(crate) fn run(mut self) -> ParseResult<()> {
        self.registry.begin_parse();
        tracing::debug!(args = self.args.len(), "parsing arguments");

        let args = self.args;
        let mut cursor = 0;
        let rest = loop {
            let Some(token) = args.get(cursor) else {
                break cursor;
            };
            let class = classify(token);
            tracing::trace!(token = %token, ?class, "classified");
            let step = match class {
                Token::Separator => {
                    let keep = self.config.keeps_separator();
                    tracing::debug!(keep, "end of options");
                    if keep {
                        break cursor;
                    }
                    break cursor + 1;
                }
                Token::Short(body) => self.short_cluster(cursor, body)?,
                Token::Long(body) => self.long_option(cursor, body)?,
                Token::Positional => {
                    self.positional(token)?;
                    Step::Next(cursor + 1)
                }
            };
            match step {
                Step::Next(next) => cursor = next,
                Step::StartPositionals => {
                    tracing::debug!(token = %token, "unknown option starts positionals");
                    break cursor;
                }
            }
        };

        for token in &args[rest..] {
            self.positional(token)?;
        }
        tracing::debug!("parsed arguments");
        Ok(())
    }

    fn short_cluster(&mut self, cursor: usize, body: &str) -> ParseResult<Step> {
        for (offset, c) in body.char_indices() {
            let name = c.to_string();
            let display = format!("-{c}");
            let Some(idx) = self.registry.find_switch(&name) else {
                return self.unknown(display);
            };

            if self.registry.spec(idx).takes_value() {
                let attached = &body[offset + c.len_utf8()..];
                if !attached.is_empty() {
                    self.hit_value(idx, &display, attached)?;
                    return Ok(Step::Next(cursor + 1));
                }
                let value = self.detached_value(cursor, &display)?;
                self.hit_value(idx, &display, value)?;
                return Ok(Step::Next(cursor + 2));
            }

            self.fire_flag(idx, &name)?;
        }
        Ok(Step::Next(cursor + 1))
    }

    fn long_option(&mut self, cursor: usize, body: &str) -> ParseResult<Step> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let display = format!("--{name}");
        let Some(idx) = self.registry.find_switch(name) else {
            return self.unknown(display);
        };
        let takes_value = self.registry.spec(idx).takes_value();

        match inline {
            Some(value) if takes_value => {
                self.hit_value(idx, &display, value)?;
                Ok(Step::Next(cursor + 1))
            }
            Some(_) => Err(ParseError::InvalidOption(display)),
            None if takes_value => {
                let value = self.detached_value(cursor, &display)?;
                self.hit_value(idx, &display, value)?;
                Ok(Step::Next(cursor + 2))
            }
            None => {
                self.fire_flag(idx, name)?;
                Ok(Step::Next(cursor + 1))
            }
        }
    }

    fn unknown(&self, display: String) -> ParseResult<Step> {
        if self.config.unknown_option_as_positional {
            Ok(Step::StartPositionals)
        } else {
            Err(ParseError::InvalidOption(display))
        }
    }

    fn detached_value(&self, cursor: usize, display: &str) -> ParseResult<&'p str> {
        match self.args.get(cursor + 1) {
            Some(next) if !next.starts_with('-') => Ok(next.as_str()),
            _ => Err(ParseError::MissingArgument(display.to_string())),
        }
    }

    fn positional(&mut self, token: &str) -> ParseResult<()> {
        loop {
            let Some(idx) = self.registry.next_positional(self.spec_cursor) else {
                return Err(ParseError::Unrecognized(token.to_string()));
            };
            self.spec_cursor = idx;

            let spec = self.registry.spec_mut(idx);
            if spec.cedes(token) {
                tracing::trace!(arg = %spec.display_name(), token, "positional cedes");
                spec.stop_accepting();
                continue;
            }
            return spec.hit_value(token).map_err(|source| ParseError::InvalidValue {
                arg: spec.display_name(),
                source,
            });
        }
    }

    fn hit_value(&mut self, idx: usize, display: &str, raw: &str) -> ParseResult<()> {
        self.registry
            .spec_mut(idx)
            .hit_value(raw)
            .map_err(|source| ParseError::InvalidValue {
                arg: display.to_string(),
                source,
            })
    }

    fn fire_flag(&mut self, idx: usize, name: &str) -> ParseResult<()> {
        let spec = self.registry.spec_mut(idx);
        spec.hit_flag(name);

        let Role::AliasFlag {
            target, injected, ..
        } = spec.role()
        else {
            return Ok(());
        };
        let (target, injected) = (target.clone(), injected.clone());
        let alias = spec.display_name();

        let Some(option) = self.registry.find_option(&target) else {
            panic!("alias flag {alias} targets `{target}`, which is not a registered option");
        };
        tracing::trace!(alias = %alias, target = %target, "alias re-fires option");
        self.hit_value(option, &names::display_name(&target), &injected)
    }
}
