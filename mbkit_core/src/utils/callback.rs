//! JSONP-style callback wrappers around UTFGrid JSON.
//!
//! Grid files are often served as `grid({...});` so that they can be loaded with a
//! `<script>` tag. On import the wrapper is removed, on export it is added back when a
//! callback name is configured.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	// identifier characters, "(", the object span, optional ")" and ";"; anything after is ignored
	static ref CALLBACK: Regex = Regex::new(r"(?s)^\s*[\w\s=+\-./$]*\(\s*(\{.*\})\s*\)?;?").unwrap();
}

/// Return the JSON object inside a callback wrapper, or the whole text if it is not wrapped.
///
/// ```
/// use mbkit_core::utils::strip_callback;
///
/// assert_eq!(strip_callback("grid({\"keys\":[]});"), "{\"keys\":[]}");
/// assert_eq!(strip_callback("{\"keys\":[]}"), "{\"keys\":[]}");
/// ```
pub fn strip_callback(text: &str) -> &str {
	match CALLBACK.captures(text).and_then(|captures| captures.get(1)) {
		Some(object) => object.as_str(),
		None => text,
	}
}

/// Wrap JSON in `callback(...);` unless the callback is absent or one of `""`, `"false"`, `"null"`.
///
/// ```
/// use mbkit_core::utils::wrap_callback;
///
/// assert_eq!(wrap_callback("{}", Some("cb")), "cb({});");
/// assert_eq!(wrap_callback("{}", Some("null")), "{}");
/// ```
pub fn wrap_callback(json: &str, callback: Option<&str>) -> String {
	match callback {
		None | Some("" | "false" | "null") => json.to_string(),
		Some(name) => format!("{name}({json});"),
	}
}
