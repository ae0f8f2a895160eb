//! Context packing: ranked hits into one bounded prompt string.
//!
//! Each hit becomes a section made of a header line followed by the
//! chunk text and a newline. Sections are joined by a newline, giving
//! one blank line between them. All lengths are counted in characters.
//!
//! The budget covers headers, text, the trailing newline and the
//! separator. Only the truncation marker may overflow it, so the output
//! is never longer than `max_chars + TRUNCATION_MARKER` characters.

use crate::core::types::RetrievedHit;

/// Appended to the text of a hit that was cut short
pub const TRUNCATION_MARKER: &str = "\n...<truncated>...";

/// Header line identifying a packed chunk
pub fn chunk_header(hit: &RetrievedHit) -> String {
    format!(
        "--- CHUNK: {}#{} (score={}) ---\n",
        hit.rel_path, hit.id, hit.score
    )
}

/// Pack `hits` in order until `max_chars` is used up.
///
/// A hit whose text does not fit is cut to the remaining budget and
/// marked; nothing is packed after it. A hit that leaves no room for
/// any text after its header is dropped along with every later hit.
pub fn pack_context(hits: &[RetrievedHit], max_chars: usize) -> String {
    let budget = max_chars as i64;
    let mut used: i64 = 0;
    let mut out = String::new();

    for (i, hit) in hits.iter().enumerate() {
        let header = chunk_header(hit);
        let separator = if i == 0 { 0 } else { 1 };
        let framing = separator + header.chars().count() as i64 + 1;

        let remain = budget - used - framing;
        if remain <= 0 {
            break;
        }

        let text_len = hit.text.chars().count() as i64;
        let truncated = text_len > remain;

        if separator == 1 {
            out.push('\n');
        }
        out.push_str(&header);
        if truncated {
            out.extend(hit.text.chars().take(remain as usize));
            out.push_str(TRUNCATION_MARKER);
        } else {
            out.push_str(&hit.text);
        }
        out.push('\n');

        if truncated {
            tracing::debug!(
                "Context budget reached at {}#{} ({} of {} chars kept)",
                hit.rel_path,
                hit.id,
                remain,
                text_len
            );
            break;
        }
        used += framing + text_len;
    }

    out
}
