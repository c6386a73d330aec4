//! Identifier → URL path scanner
//!
//! Converts identifier-style names into convention paths in a single
//! left-to-right pass with one character of lookahead on the escape marker.
//!
//! # Rules
//!
//! - ASCII uppercase letter: starts a new segment, `U` → `/u`
//! - `_8` → `/*` (wildcard segment)
//! - `_1` → `/:` (path parameter segment)
//! - `_x` → `x` for any other character (marker dropped)
//! - trailing `_` → nothing
//! - anything else is copied unchanged
//!
//! No normalization and no validation happens here: a path the router
//! cannot accept is rejected when it is registered.

/// Marker that introduces an escape sequence
pub const ESCAPE: char = '_';

/// Single-use scanner over one identifier
///
/// Consumes itself on [`Scanner::into_path`], so it cannot be reused
/// across inputs.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    chars: std::str::Chars<'a>,
    out: String,
}

impl<'a> Scanner<'a> {
    pub fn new(ident: &'a str) -> Self {
        Self {
            chars: ident.chars(),
            // Each uppercase letter grows the output by one byte
            out: String::with_capacity(ident.len() * 2),
        }
    }

    /// Runs the scan to completion and returns the convention path
    pub fn into_path(mut self) -> String {
        while let Some(c) = self.chars.next() {
            match c {
                'A'..='Z' => {
                    self.out.push('/');
                    self.out.push(c.to_ascii_lowercase());
                }
                ESCAPE => match self.chars.next() {
                    Some('8') => self.out.push_str("/*"),
                    Some('1') => self.out.push_str("/:"),
                    Some(other) => self.out.push(other),
                    None => break,
                },
                _ => self.out.push(c),
            }
        }
        self.out
    }
}

/// Parses an identifier into its convention path
///
/// **Pure function**: same input → same output.
///
/// # Examples
///
/// ```
/// use conroute_naming::parse_name;
///
/// assert_eq!(parse_name("Ping"), "/ping");
/// assert_eq!(parse_name("UserID"), "/user/i/d");
/// assert_eq!(parse_name("Files_8filepath"), "/files/*filepath");
/// assert_eq!(parse_name("User_1id"), "/user/:id");
/// assert_eq!(parse_name("admin"), "admin");
/// assert_eq!(parse_name(""), "");
/// ```
pub fn parse_name(ident: &str) -> String {
    Scanner::new(ident).into_path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("UserID", "/user/i/d")]
    #[case("User_8", "/user/*")]
    #[case("User_1Name", "/user/:/name")]
    #[case("User_1id", "/user/:id")]
    #[case("Static_8filepath", "/static/*filepath")]
    #[case("Ping", "/ping")]
    #[case("lower", "lower")]
    #[case("v2", "v2")]
    fn test_parse_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_name(input), expected);
    }

    #[test]
    fn test_escape_followed_by_uppercase() {
        // The escape consumes exactly one character; the next uppercase
        // letter still opens its own segment.
        assert_eq!(parse_name("A_1B"), "/a/:/b");
        assert_eq!(parse_name("A_8B"), "/a/*/b");
    }

    #[test]
    fn test_escape_consumes_uppercase() {
        // `_X` emits `X` verbatim: no segment, no lowercasing
        assert_eq!(parse_name("Api_V2"), "/apiV2");
    }

    #[test]
    fn test_literal_escapes() {
        assert_eq!(parse_name("Index_.html"), "/index.html");
        assert_eq!(parse_name("Double__"), "/double_");
        assert_eq!(parse_name("Dash_-case"), "/dash-case");
    }

    #[test]
    fn test_trailing_marker_is_dropped() {
        assert_eq!(parse_name("User_"), "/user");
        assert_eq!(parse_name("_"), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_name(""), "");
    }

    #[test]
    fn test_non_ascii_is_copied() {
        assert_eq!(parse_name("Café"), "/café");
        assert_eq!(parse_name("a_é"), "aé");
    }
}
