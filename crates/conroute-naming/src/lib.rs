//! # conroute naming
//!
//! The naming convention shared by the `conroute` runtime and its
//! procedural macros:
//! - [`parse_name`] turns an identifier such as `User_1id` into the URL
//!   path `/user/:id`
//! - [`classify`] splits a method name into an [`Action`] and the remainder
//!   that feeds the scanner
//!
//! Both are pure functions with no allocation beyond the returned path.
//!
//! ## Example
//!
//! ```
//! use conroute_naming::{classify, parse_name, Action, Verb};
//!
//! let token = classify("GetUser_1id").unwrap();
//! assert_eq!(token.action, Action::Verb(Verb::Get));
//! assert_eq!(parse_name(token.remainder), "/user/:id");
//! ```

pub mod scanner;
pub mod vocabulary;

pub use scanner::{parse_name, Scanner};
pub use vocabulary::{classify, is_action_name, Action, ActionToken, StaticKind, Verb, USE_METHOD};
