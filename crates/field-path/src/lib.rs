//! This library provides a validated, canonical path type used to address
//! fields of a resource schema. Paths are relative to the Spec or Status root
//! of a resource and consist of dot-separated field names. A segment can also
//! be the element wildcard, which denotes "inside an element of a repeated
//! structure". It is written as an empty segment, which means that a wildcard
//! between two field names produces two consecutive dots.
//!
//! ## Usage
//!
//! Paths can be parsed and validated from [`str`] using Rust's standard
//! [`FromStr`](std::str::FromStr) trait.
//!
//! ```
//! use field_path::{FieldPath, Segment};
//!
//! let path: FieldPath = "Users..Password".parse()
//!     .expect("valid field path");
//!
//! assert!(path.has_wildcard());
//! assert_eq!(path.name(), "Password");
//! assert_eq!(path.segments()[1], Segment::Element);
//! ```
//!
//! Alternatively, they can be constructed programmatically, one segment at a
//! time.
//!
//! ```
//! use field_path::FieldPath;
//!
//! let path = FieldPath::new("Users")
//!     .and_then(|p| p.element_child("Password"))
//!     .expect("valid field path");
//!
//! assert_eq!(path.to_string(), "Users..Password");
//! ```

mod path;
mod segment;

pub use path::*;
pub use segment::*;
