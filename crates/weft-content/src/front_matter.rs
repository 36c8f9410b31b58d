//! Front matter fence splitting.
//!
//! Documents may open with a YAML block between `---` fence lines:
//!
//! ```text
//! ---
//! title: Guide
//! ---
//! Body starts here.
//! ```
//!
//! A document without an opening fence has no front matter; an opening
//! fence without a closing one is malformed.

/// A document split into its optional front matter and its body.
pub(crate) struct Split<'a> {
    /// Raw YAML between the fences, if present.
    pub matter: Option<&'a str>,
    /// Everything after the closing fence (or the whole document).
    pub body: &'a str,
}

/// Split a document at its front matter fences.
pub(crate) fn split(content: &str) -> Result<Split<'_>, String> {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok(Split {
            matter: None,
            body: content,
        });
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Ok(Split {
                matter: Some(&rest[..offset]),
                body: &rest[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    Err("unterminated front matter fence".to_owned())
}
