//! Outgoing message chunking
//!
//! Provider replies routinely exceed Discord's message limit. Replies are
//! split UTF-8-safely, preferring line boundaries, under a configurable cap
//! (`MAX_CHARS_PER_MESSAGE`) that is never allowed past Discord's own 2000.

/// Discord message content limit in bytes.
pub const MESSAGE_LIMIT: usize = 2000;

/// Split `text` into send-ready pieces of at most `cap` bytes.
///
/// `cap` is clamped to [`MESSAGE_LIMIT`]. Splits land on line boundaries
/// when possible and never inside a UTF-8 character.
pub fn chunk_message(text: &str, cap: usize) -> Vec<String> {
    let cap = effective_cap(cap);
    if text.len() <= cap {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        // +1 for the newline this line carries in the output
        if !current.is_empty() && current.len() + line.len() + 1 > cap {
            chunks.push(current.trim_end().to_string());
            current = String::new();
        }
        if line.len() + 1 > cap {
            split_long_line(line, cap, &mut chunks);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.is_empty() {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

/// Truncate `text` to `cap` bytes with a trailing ellipsis, on a char boundary.
pub fn truncate_message(text: &str, cap: usize) -> String {
    let cap = effective_cap(cap);
    if text.len() <= cap {
        return text.to_string();
    }
    let mut end = cap.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

fn effective_cap(cap: usize) -> usize {
    cap.clamp(1, MESSAGE_LIMIT)
}

fn split_long_line(line: &str, cap: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();
    for ch in line.chars() {
        if current.len() + ch.len_utf8() > cap && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk_message("hello", 100), vec!["hello"]);
    }

    #[test]
    fn test_chunks_prefer_line_boundaries() {
        let chunks = chunk_message("line one\nline two\nline three", 12);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 12);
            assert!(!chunk.ends_with('\n'));
        }
    }

    #[test]
    fn test_long_single_line_is_split() {
        let chunks = chunk_message(&"a".repeat(100), 30);
        assert!(chunks.len() >= 4);
        for chunk in &chunks {
            assert!(chunk.len() <= 30);
        }
    }

    #[test]
    fn test_cap_clamped_to_discord_limit() {
        let chunks = chunk_message(&"a".repeat(5000), 999_999);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.len() <= MESSAGE_LIMIT);
        }
    }

    #[test]
    fn test_multibyte_never_split() {
        let text = "こんにちは世界 ".repeat(400);
        for chunk in chunk_message(&text, 500) {
            assert!(chunk.len() <= 500);
            // would panic on an invalid boundary
            assert!(chunk.chars().count() > 0);
        }
    }

    #[test]
    fn test_truncate_short_passthrough() {
        assert_eq!(truncate_message("short", 100), "short");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let out = truncate_message(&"a".repeat(3000), 2000);
        assert_eq!(out.len(), 2000);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_exactly_at_cap() {
        let text = "a".repeat(100);
        let chunks = chunk_message(&text, 100);
        assert_eq!(chunks, vec![text]);
    }
}
