//! Action vocabulary and method classifier
//!
//! A method participates in routing when its name starts with one of the
//! vocabulary prefixes and at least one word character follows:
//!
//! | Prefix | Action |
//! |---|---|
//! | `Get` `Head` `Post` `Put` `Patch` `Delete` `Connect` `Options` `Trace` | HTTP verb |
//! | `StaticFileFS` `StaticFile` `StaticFS` `Static` | static mount |
//!
//! Alternatives are tried in table order and the first one that leaves a
//! non-empty remainder wins, so a method named exactly `StaticFile` is a
//! `Static` action with remainder `File`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Name of the per-level middleware method
pub const USE_METHOD: &str = "Use";

/// HTTP verbs recognized as method prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
}

impl Verb {
    pub const ALL: [Verb; 9] = [
        Verb::Get,
        Verb::Head,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Connect,
        Verb::Options,
        Verb::Trace,
    ];

    /// Method-name prefix, e.g. `Get`
    pub fn prefix(self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::Head => "Head",
            Verb::Post => "Post",
            Verb::Put => "Put",
            Verb::Patch => "Patch", // RFC 5789
            Verb::Delete => "Delete",
            Verb::Connect => "Connect",
            Verb::Options => "Options",
            Verb::Trace => "Trace",
        }
    }

    /// Upper-case HTTP method name, e.g. `GET`
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Connect => "CONNECT",
            Verb::Options => "OPTIONS",
            Verb::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static-serving actions
///
/// Each kind expects a different argument tuple from its method:
/// - `File`: `(mount, file)`
/// - `FileFs`: `(mount, file, filesystem)`
/// - `Dir`: `(mount, root)`
/// - `Fs`: `(mount, filesystem)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticKind {
    FileFs,
    File,
    Fs,
    Dir,
}

impl StaticKind {
    pub const ALL: [StaticKind; 4] = [
        StaticKind::FileFs,
        StaticKind::File,
        StaticKind::Fs,
        StaticKind::Dir,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            StaticKind::FileFs => "StaticFileFS",
            StaticKind::File => "StaticFile",
            StaticKind::Fs => "StaticFS",
            StaticKind::Dir => "Static",
        }
    }
}

impl fmt::Display for StaticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// What a classified method does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Verb(Verb),
    Static(StaticKind),
}

impl Action {
    fn from_prefix(prefix: &str) -> Option<Self> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.prefix() == prefix)
            .map(Action::Verb)
            .or_else(|| {
                StaticKind::ALL
                    .into_iter()
                    .find(|kind| kind.prefix() == prefix)
                    .map(Action::Static)
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Verb(verb) => verb.fmt(f),
            Action::Static(kind) => kind.fmt(f),
        }
    }
}

/// A classified method name
///
/// `remainder` is the word run after the prefix. Verb actions convert it
/// into a path; static actions ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionToken<'a> {
    pub action: Action,
    pub remainder: &'a str,
}

static ACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let prefixes = Verb::ALL
        .iter()
        .map(|verb| verb.prefix())
        .chain(StaticKind::ALL.iter().map(|kind| kind.prefix()))
        .collect::<Vec<_>>()
        .join("|");
    // Vocabulary is a compile-time constant, so the pattern always compiles
    Regex::new(&format!(r"^({prefixes})((?-u:\w)+)")).expect("action vocabulary pattern")
});

/// Classifies a method name against the action vocabulary
///
/// Returns `None` for names outside the convention; that is not an error.
///
/// # Examples
///
/// ```
/// use conroute_naming::{classify, Action, StaticKind, Verb};
///
/// let token = classify("GetPing").unwrap();
/// assert_eq!(token.action, Action::Verb(Verb::Get));
/// assert_eq!(token.remainder, "Ping");
///
/// assert!(classify("Get").is_none());
/// assert!(classify("get_ping").is_none());
///
/// let token = classify("StaticFileIcon").unwrap();
/// assert_eq!(token.action, Action::Static(StaticKind::File));
/// ```
pub fn classify(name: &str) -> Option<ActionToken<'_>> {
    let captures = ACTION_PATTERN.captures(name)?;
    let prefix = captures.get(1)?.as_str();
    let remainder = captures.get(2)?.as_str();
    Action::from_prefix(prefix).map(|action| ActionToken { action, remainder })
}

/// Whether `name` takes part in routing as an action method
pub fn is_action_name(name: &str) -> bool {
    classify(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("GetPing", Verb::Get, "Ping")]
    #[case("HeadPing", Verb::Head, "Ping")]
    #[case("PostUser", Verb::Post, "User")]
    #[case("PutUser_1id", Verb::Put, "User_1id")]
    #[case("PatchUser", Verb::Patch, "User")]
    #[case("DeleteUser", Verb::Delete, "User")]
    #[case("ConnectTunnel", Verb::Connect, "Tunnel")]
    #[case("OptionsAll", Verb::Options, "All")]
    #[case("TraceEcho", Verb::Trace, "Echo")]
    #[case("Getter", Verb::Get, "ter")]
    fn test_classify_verbs(#[case] name: &str, #[case] verb: Verb, #[case] remainder: &str) {
        let token = classify(name).unwrap();
        assert_eq!(token.action, Action::Verb(verb));
        assert_eq!(token.remainder, remainder);
    }

    #[rstest]
    #[case("StaticFileFSIndex", StaticKind::FileFs)]
    #[case("StaticFileCode", StaticKind::File)]
    #[case("StaticFSAssets", StaticKind::Fs)]
    #[case("StaticAssets", StaticKind::Dir)]
    fn test_classify_static(#[case] name: &str, #[case] kind: StaticKind) {
        assert_eq!(classify(name).unwrap().action, Action::Static(kind));
    }

    #[test]
    fn test_prefix_without_remainder_falls_through() {
        // `StaticFile` needs a remainder, so `Static` + `File` wins
        let token = classify("StaticFile").unwrap();
        assert_eq!(token.action, Action::Static(StaticKind::Dir));
        assert_eq!(token.remainder, "File");

        let token = classify("StaticFileFS").unwrap();
        assert_eq!(token.action, Action::Static(StaticKind::File));
        assert_eq!(token.remainder, "FS");
    }

    #[rstest]
    #[case("Get")]
    #[case("Static")]
    #[case("Use")]
    #[case("get_ping")]
    #[case("Fetch")]
    #[case("")]
    #[case("Get-ping")]
    fn test_classify_no_match(#[case] name: &str) {
        assert!(classify(name).is_none());
        assert!(!is_action_name(name));
    }

    #[test]
    fn test_remainder_stops_at_non_word() {
        let token = classify("GetUser-x").unwrap();
        assert_eq!(token.remainder, "User");
    }

    #[test]
    fn test_verb_display() {
        assert_eq!(Verb::Options.to_string(), "OPTIONS");
        assert_eq!(Action::Static(StaticKind::Fs).to_string(), "StaticFS");
    }
}
