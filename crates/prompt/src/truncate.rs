//! Line-boundary response splitting and truncation.
//!
//! Chat transports cap message sizes (Discord: 2000). A model response
//! that exceeds the cap is cut at a line boundary so a code block or
//! sentence is never sheared mid-line.

/// Split a response into chunks that each fit within `max_bytes`,
/// breaking only at line boundaries.
///
/// A single line longer than the cap is hard-cut at the nearest char
/// boundary — the one case where a line boundary cannot be honored.
pub fn split_response(content: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in content.split('\n') {
        let needed = if current.is_empty() {
            line.len()
        } else {
            current.len() + 1 + line.len()
        };
        if needed <= max_bytes {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        } else {
            if !current.is_empty() {
                chunks.push(current);
            }
            current = line.to_string();
            // Overlong single line: hard-cut into cap-sized pieces
            while current.len() > max_bytes {
                let cut = floor_char_boundary(&current, max_bytes);
                let rest = current.split_off(cut);
                chunks.push(std::mem::replace(&mut current, rest));
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Keep only the leading chunk of an oversized response.
///
/// The kept prefix never exceeds `max_bytes` and never splits a line,
/// except when the very first line alone exceeds the cap (dropping the
/// entire response would lose more than splitting one line).
pub fn truncate_response(content: &str, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content.to_string();
    }
    split_response(content, max_bytes)
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
