//! Registration name lists such as `"v,verbose"` or `"-r,--release,!-d,!--debug"`.
//!
//! Names are stored without their dashes. A one-character name is matched by
//! short tokens (`-v`), and any name is matched by long tokens (`--verbose`).

use crate::error::{SetupError, SetupResult};

/// Positive and negated names parsed from one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    pub names: Vec<String>,
    pub negated: Vec<String>,
}

impl NameSet {
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .chain(self.negated.iter())
            .map(String::as_str)
    }
}

/// Parse a comma separated name list. `allow_negated` is true for flags only.
pub fn parse_names(spec: &str, allow_negated: bool) -> SetupResult<NameSet> {
    if spec.trim().is_empty() {
        return Err(SetupError::EmptyNameSpec);
    }

    let mut set = NameSet::default();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(SetupError::EmptyName(spec.to_string()));
        }

        let (negated, body) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let name = strip_dashes(body);
        check_name(name, token)?;

        if negated && !allow_negated {
            return Err(SetupError::NegatedNonFlag(name.to_string()));
        }
        if set.all().any(|existing| existing == name) {
            return Err(SetupError::DuplicateName {
                name: display_name(name),
            });
        }

        if negated {
            set.negated.push(name.to_string());
        } else {
            set.names.push(name.to_string());
        }
    }

    if set.names.is_empty() && set.negated.is_empty() {
        return Err(SetupError::EmptyNameSpec);
    }
    Ok(set)
}

/// A positional's name is a single bare identifier.
pub fn parse_positional_name(name: &str) -> SetupResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SetupError::EmptyNameSpec);
    }
    if trimmed.starts_with('-') || trimmed.contains(',') {
        return Err(SetupError::MalformedName(name.to_string()));
    }
    check_name(trimmed, name)?;
    Ok(trimmed.to_string())
}

/// `-x` for one-character names, `--name` otherwise.
pub fn display_name(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

fn strip_dashes(token: &str) -> &str {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token)
}

fn check_name(name: &str, token: &str) -> SetupResult<()> {
    if name.is_empty() {
        return Err(SetupError::EmptyName(token.to_string()));
    }
    let malformed = name.starts_with('-')
        || name
            .chars()
            .any(|c| c == '=' || c == '!' || c.is_whitespace());
    if malformed {
        return Err(SetupError::MalformedName(token.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_prefix_form() {
        let set = parse_names(" -r , --release,!-d, !--debug, v, !q ", true).unwrap();
        assert_eq!(set.names, ["r", "release", "v"]);
        assert_eq!(set.negated, ["d", "debug", "q"]);
    }

    #[test]
    fn rejects_malformed_lists() {
        assert_eq!(parse_names("", true), Err(SetupError::EmptyNameSpec));
        assert_eq!(parse_names("  ", true), Err(SetupError::EmptyNameSpec));
        assert!(matches!(parse_names("a,,b", true), Err(SetupError::EmptyName(_))));
        assert!(matches!(parse_names("--", true), Err(SetupError::EmptyName(_))));
        assert!(matches!(parse_names("---x", true), Err(SetupError::MalformedName(_))));
        assert!(matches!(parse_names("out=put", true), Err(SetupError::MalformedName(_))));
        assert!(matches!(parse_names("two words", true), Err(SetupError::MalformedName(_))));
        assert!(matches!(parse_names("!!x", true), Err(SetupError::MalformedName(_))));
    }

    #[test]
    fn negation_is_reserved_for_flags() {
        assert_eq!(
            parse_names("o,!O", false),
            Err(SetupError::NegatedNonFlag("O".to_string()))
        );
    }

    #[test]
    fn repeated_names_in_one_list_conflict() {
        let err = parse_names("v,-v", true).unwrap_err();
        assert_eq!(err.to_string(), "name conflict: '-v' is already registered");
        assert!(parse_names("x,!x", true).is_err());
    }

    #[test]
    fn positional_names_are_bare() {
        assert_eq!(parse_positional_name(" files ").unwrap(), "files");
        assert!(parse_positional_name("-f").is_err());
        assert!(parse_positional_name("a,b").is_err());
        assert!(parse_positional_name("").is_err());
    }
}
