//! Pre-conversion cleanup passes for documentation source.
//!
//! Each pass is a function `&str -> String` applied in sequence. The passes
//! remove authoring-toolchain leftovers that should never reach the reader.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Fence written in place of hint directives.
const CODE_FENCE: &str = "```";

/// Run the full cleanup pipeline on raw documentation source.
pub(crate) fn run_pipeline(raw: &str) -> String {
    let mut result = strip_front_matter(raw);

    result = strip_directives_except_hints(&result);
    result = convert_hints(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Leading description block
// ---------------------------------------------------------------------------

/// Remove a leading `---` block whose first line is a `description:` key.
pub(crate) fn strip_front_matter(text: &str) -> String {
    static FRONT_MATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)\A\s*---\r?\ndescription:.*?\n---[ \t]*(?:\r?\n)?").expect("valid regex")
    });

    FRONT_MATTER_RE.replace(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Templating directives
// ---------------------------------------------------------------------------

static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{% .*?%\}").expect("valid regex"));

/// Remove every `{% ... %}` directive.
pub fn strip_directives(text: &str) -> String {
    DIRECTIVE_RE.replace_all(text, "").into_owned()
}

/// Remove `{% ... %}` directives, leaving hint open/close tags for [`convert_hints`].
fn strip_directives_except_hints(text: &str) -> String {
    DIRECTIVE_RE
        .replace_all(text, |caps: &Captures| {
            let tag = &caps[0];
            if tag.starts_with("{% hint ") || tag.starts_with("{% endhint ") {
                tag.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Hint blocks
// ---------------------------------------------------------------------------

/// Turn the first hint open/close pair into code fences.
///
/// Only the first occurrence of each directive is replaced; later hint
/// blocks keep their directives and are removed by the final strip.
pub(crate) fn convert_hints(text: &str) -> String {
    static HINT_OPEN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{% hint .*?%\}").expect("valid regex"));
    static HINT_CLOSE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{% endhint .*?%\}").expect("valid regex"));

    let opened = HINT_OPEN_RE.replace(text, CODE_FENCE);
    HINT_CLOSE_RE.replace(&opened, CODE_FENCE).into_owned()
}
