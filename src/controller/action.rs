//! Action tables and the URL token naming convention
//!
//! The last path segment `say-hello` names the action `SayHelloAction`.

use crate::error::ActionResult;

/// Suffix every action name carries
pub const ACTION_SUFFIX: &str = "Action";

/// A zero-argument action on controller `C`
pub type Action<C> = fn(&mut C) -> ActionResult;

/// Named actions exposed by one controller type
pub struct ActionTable<C> {
    entries: Vec<(String, Action<C>)>,
}

impl<C> ActionTable<C> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an action under its full name, e.g. `"SayHelloAction"`
    #[must_use]
    pub fn action(mut self, name: impl Into<String>, action: Action<C>) -> Self {
        self.entries.push((name.into(), action));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Action<C>)> {
        self.entries
    }
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the action name from a URL token
///
/// Each `-`-separated word gets an upper-cased first letter, hyphens are
/// dropped, and [`ACTION_SUFFIX`] is appended.
///
/// # Examples
/// ```
/// use rust_dispatcher::controller::action_name;
/// assert_eq!(action_name("hello"), "HelloAction");
/// assert_eq!(action_name("say-hello-world"), "SayHelloWorldAction");
/// ```
pub fn action_name(token: &str) -> String {
    let mut name = String::with_capacity(token.len() + ACTION_SUFFIX.len());
    for word in token.split('-') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name.push_str(ACTION_SUFFIX);
    name
}

/// Whether some URL token maps onto `name` through [`action_name`]
pub fn is_reachable_action_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(ACTION_SUFFIX) else {
        return false;
    };
    let mut chars = stem.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if stem.contains(['-', '/']) {
        return false;
    }
    first.to_uppercase().eq(std::iter::once(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    fn noop(_: &mut Dummy) -> ActionResult {
        Ok(())
    }

    #[test]
    fn test_action_name() {
        assert_eq!(action_name("hello"), "HelloAction");
        assert_eq!(action_name("say-hello"), "SayHelloAction");
        assert_eq!(action_name("say-hello-world"), "SayHelloWorldAction");
        assert_eq!(action_name("listAll"), "ListAllAction");
        assert_eq!(action_name("v2"), "V2Action");
        assert_eq!(action_name("a--b-"), "ABAction");
    }

    #[test]
    fn test_reachable_names() {
        assert!(is_reachable_action_name("HelloAction"));
        assert!(is_reachable_action_name("SayHelloWorldAction"));
        assert!(is_reachable_action_name("V2Action"));
        assert!(!is_reachable_action_name("helloAction"));
        assert!(!is_reachable_action_name("Action"));
        assert!(!is_reachable_action_name("Hello"));
        assert!(!is_reachable_action_name("Say-HelloAction"));
    }

    #[test]
    fn test_every_derived_name_is_reachable() {
        for token in ["hello", "say-hello", "x", "get-v2-items", "été"] {
            assert!(is_reachable_action_name(&action_name(token)), "{token}");
        }
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let table = ActionTable::<Dummy>::new()
            .action("HelloAction", noop)
            .action("ByeAction", noop);
        assert_eq!(table.len(), 2);
        let names: Vec<String> = table.into_entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["HelloAction", "ByeAction"]);
    }
}
