//! Action selection and input parsing.
//!
//! The option layer hands us one raw indicator per phonebook action.
//! [`ActionSelector`] enforces the exactly-one-or-zero rule, and
//! [`RawAction::resolve`] turns the surviving selection into a fully
//! typed [`Action`].

use std::sync::OnceLock;

use thiserror::Error;

/// Raw option values supplied by the command-line layer, one per action.
///
/// An index of `Some(n)` or a non-empty string means the corresponding
/// option was given. The core never reads flag syntax or help text.
#[derive(Debug, Default, Clone)]
pub struct PhonebookOptions {
    pub query_configuration: bool,
    pub read_index: Option<u32>,
    pub read_all: bool,
    pub write: Option<String>,
    pub entry_update: Option<String>,
    pub delete_index: Option<u32>,
    pub delete_all: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("too many phonebook actions requested ({requested})")]
    TooManyActions { requested: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("couldn't parse input string, missing arguments")]
    MissingArguments,
    #[error("couldn't parse input string, too many arguments")]
    TooManyArguments,
    #[error("couldn't parse entry index '{value}'")]
    InvalidIndex { value: String },
}

/// A selected action, before its string arguments are parsed.
///
/// Write/update still carry the raw delimited input here: parse failures
/// must be reported as a failed action outcome through the runner, not as
/// a selection error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAction {
    QueryConfiguration,
    Read { index: u32 },
    ReadAll,
    Write { input: String },
    Update { input: String },
    Delete { index: u32 },
    DeleteAll,
}

/// One fully-typed phonebook operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    QueryConfiguration,
    ReadOne { index: u32 },
    ReadAll,
    Write { name: String, number: String },
    UpdateEntry { name: String, number: String, index: u32 },
    DeleteOne { index: u32 },
    DeleteAll,
}

impl PhonebookOptions {
    /// Collect every requested action. More than one element means the
    /// caller stacked mutually exclusive options.
    fn requested(&self) -> Vec<RawAction> {
        let mut actions = Vec::new();
        if self.query_configuration {
            actions.push(RawAction::QueryConfiguration);
        }
        if let Some(index) = self.read_index {
            actions.push(RawAction::Read { index });
        }
        if self.read_all {
            actions.push(RawAction::ReadAll);
        }
        if let Some(input) = &self.write {
            actions.push(RawAction::Write {
                input: input.clone(),
            });
        }
        if let Some(input) = &self.entry_update {
            actions.push(RawAction::Update {
                input: input.clone(),
            });
        }
        if let Some(index) = self.delete_index {
            actions.push(RawAction::Delete { index });
        }
        if self.delete_all {
            actions.push(RawAction::DeleteAll);
        }
        actions
    }
}

/// Validates the mutually exclusive action indicators exactly once.
///
/// The decision is memoized; repeated [`select`](Self::select) calls
/// return the cached result without re-validating.
pub struct ActionSelector {
    options: PhonebookOptions,
    decision: OnceLock<Result<Option<RawAction>, ConfigError>>,
}

impl ActionSelector {
    pub fn new(options: PhonebookOptions) -> Self {
        Self {
            options,
            decision: OnceLock::new(),
        }
    }

    /// Pick the one enabled action.
    ///
    /// `Ok(None)` when no action was requested; the caller may treat
    /// that as inactive. `Err` when more than one was requested, which
    /// is fatal before any request is built.
    pub fn select(&self) -> Result<Option<RawAction>, ConfigError> {
        self.decision
            .get_or_init(|| {
                let mut actions = self.options.requested();
                match actions.len() {
                    0 => Ok(None),
                    1 => Ok(Some(actions.remove(0))),
                    n => Err(ConfigError::TooManyActions { requested: n }),
                }
            })
            .clone()
    }
}

impl RawAction {
    /// Parse the delimited string arguments into a typed [`Action`].
    pub fn resolve(self) -> Result<Action, ParseError> {
        match self {
            RawAction::QueryConfiguration => Ok(Action::QueryConfiguration),
            RawAction::Read { index } => Ok(Action::ReadOne { index }),
            RawAction::ReadAll => Ok(Action::ReadAll),
            RawAction::Delete { index } => Ok(Action::DeleteOne { index }),
            RawAction::DeleteAll => Ok(Action::DeleteAll),
            RawAction::Write { input } => {
                let [name, number] = split_entry_fields::<2>(&input)?;
                Ok(Action::Write { name, number })
            }
            RawAction::Update { input } => {
                let [name, number, index_str] = split_entry_fields::<3>(&input)?;
                let index = index_str
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ParseError::InvalidIndex { value: index_str })?;
                Ok(Action::UpdateEntry {
                    name,
                    number,
                    index,
                })
            }
        }
    }
}

/// Split `"<Name>,<Number>[,<Index>]"` into exactly `N` fields.
fn split_entry_fields<const N: usize>(input: &str) -> Result<[String; N], ParseError> {
    let fields: Vec<&str> = input.split(',').collect();
    if fields.len() > N {
        return Err(ParseError::TooManyArguments);
    }
    if fields.len() < N {
        return Err(ParseError::MissingArguments);
    }
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.to_string();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(options: PhonebookOptions) -> Result<Option<RawAction>, ConfigError> {
        ActionSelector::new(options).select()
    }

    #[test]
    fn test_no_action_selected() {
        assert_eq!(select(PhonebookOptions::default()), Ok(None));
    }

    #[test]
    fn test_single_action_selected() {
        let result = select(PhonebookOptions {
            read_index: Some(4),
            ..Default::default()
        });
        assert_eq!(result, Ok(Some(RawAction::Read { index: 4 })));

        let result = select(PhonebookOptions {
            delete_all: true,
            ..Default::default()
        });
        assert_eq!(result, Ok(Some(RawAction::DeleteAll)));
    }

    #[test]
    fn test_too_many_actions() {
        let result = select(PhonebookOptions {
            query_configuration: true,
            read_all: true,
            ..Default::default()
        });
        assert_eq!(result, Err(ConfigError::TooManyActions { requested: 2 }));

        let result = select(PhonebookOptions {
            write: Some("A,1".into()),
            entry_update: Some("B,2,3".into()),
            delete_index: Some(1),
            ..Default::default()
        });
        assert_eq!(result, Err(ConfigError::TooManyActions { requested: 3 }));
    }

    #[test]
    fn test_selection_is_memoized() {
        let selector = ActionSelector::new(PhonebookOptions {
            read_all: true,
            ..Default::default()
        });
        let first = selector.select();
        let second = selector.select();
        assert_eq!(first, Ok(Some(RawAction::ReadAll)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_write() {
        let action = RawAction::Write {
            input: "Alice,5551234".into(),
        }
        .resolve()
        .unwrap();
        assert_eq!(
            action,
            Action::Write {
                name: "Alice".into(),
                number: "5551234".into(),
            }
        );
    }

    #[test]
    fn test_resolve_update() {
        let action = RawAction::Update {
            input: "Bob,5559876,3".into(),
        }
        .resolve()
        .unwrap();
        assert_eq!(
            action,
            Action::UpdateEntry {
                name: "Bob".into(),
                number: "5559876".into(),
                index: 3,
            }
        );
    }

    #[test]
    fn test_resolve_field_count_mismatch() {
        let err = RawAction::Write {
            input: "OnlyName".into(),
        }
        .resolve()
        .unwrap_err();
        assert_eq!(err, ParseError::MissingArguments);

        let err = RawAction::Write {
            input: "A,B,C".into(),
        }
        .resolve()
        .unwrap_err();
        assert_eq!(err, ParseError::TooManyArguments);

        let err = RawAction::Update {
            input: "A,B".into(),
        }
        .resolve()
        .unwrap_err();
        assert_eq!(err, ParseError::MissingArguments);
    }

    #[test]
    fn test_resolve_update_rejects_bad_index() {
        let err = RawAction::Update {
            input: "Bob,5559876,three".into(),
        }
        .resolve()
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidIndex {
                value: "three".into()
            }
        );
    }
}
