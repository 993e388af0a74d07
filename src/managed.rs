//! Managed blocks inside generated files
//!
//! Generated integration files (AGENTS.md, CLAUDE.md, per-agent prompt
//! files) may coexist with user-authored text. Everything between the start
//! and end markers belongs to graft and is rewritten wholesale; everything
//! outside the markers is user-owned and preserved byte-for-byte.

/// Marks the beginning of graft-managed content
pub const MANAGED_BLOCK_START: &str = "<!-- GRAFT:START -->";
/// Marks the end of graft-managed content
pub const MANAGED_BLOCK_END: &str = "<!-- GRAFT:END -->";

/// Locate a managed block in `content`.
///
/// Returns `Some((start, end))` where `start` is the byte index of the start
/// marker and `end` is the byte index just past the end marker. Content with
/// a missing marker, or with the end marker before the start marker, has no
/// managed block.
pub fn detect_managed_block(content: &str) -> Option<(usize, usize)> {
    let start = content.find(MANAGED_BLOCK_START)?;
    let end = content.find(MANAGED_BLOCK_END)?;

    if end <= start {
        return None;
    }

    Some((start, end + MANAGED_BLOCK_END.len()))
}

/// Replace the managed block in `content` with `new_block`, preserving
/// everything outside the markers. Falls back to appending when no managed
/// block exists.
pub fn replace_managed_block(content: &str, new_block: &str) -> String {
    match detect_managed_block(content) {
        Some((start, end)) => {
            let before = &content[..start];
            let after = &content[end..];
            format!("{}{}{}", before, format_managed_block(new_block), after)
        }
        None => append_managed_block(content, new_block),
    }
}

/// Append a managed block to existing content, separated by a blank line
/// when the content is non-empty.
pub fn append_managed_block(content: &str, new_block: &str) -> String {
    let mut out = content.to_string();

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    if !out.is_empty() {
        out.push('\n');
    }

    out.push_str(&format_managed_block(new_block));
    out.push('\n');
    out
}

/// Strip the managed block from `content`.
///
/// Returns the remaining text and whether a block was found. A trailing
/// blank line left behind by the removal is collapsed so repeated
/// add/remove cycles do not accumulate whitespace.
pub fn remove_managed_block(content: &str) -> (String, bool) {
    match detect_managed_block(content) {
        Some((start, end)) => {
            let mut before = content[..start].to_string();
            let after = &content[end..];
            while before.ends_with("\n\n") {
                before.pop();
            }
            (format!("{}{}", before, after), true)
        }
        None => (content.to_string(), false),
    }
}

/// Build the content of a brand-new file: a minimal header followed by the
/// managed block.
pub fn create_file_with_managed_block(new_block: &str) -> String {
    let mut out = String::from("# Agent Instructions\n\n");
    out.push_str("This file contains shared guidelines for AI assistants working in this project.\n\n");
    out.push_str(&format_managed_block(new_block));
    out.push('\n');
    out
}

/// Wrap content in the managed-block markers, normalizing the trailing
/// newline before the end marker.
///
/// No newline follows the end marker: in a replacement the text after the
/// detected block already starts with whatever separator the file had, and
/// adding one here would grow the file on every merge.
fn format_managed_block(content: &str) -> String {
    let mut out = String::with_capacity(
        MANAGED_BLOCK_START.len() + content.len() + MANAGED_BLOCK_END.len() + 2,
    );
    out.push_str(MANAGED_BLOCK_START);
    out.push('\n');
    out.push_str(content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(MANAGED_BLOCK_END);
    out
}
