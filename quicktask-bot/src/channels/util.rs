//! Shared utilities for channel implementations.

/// Discord's per-message character limit
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Split a message into chunks respecting a platform's character limit.
/// Splits on line boundaries; lines exceeding `max_len` are hard-split on char boundaries.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line_len = line.chars().count();
        let current_len = current.chars().count();

        if current_len + line_len + 1 > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if line_len > max_len {
                let chars: Vec<char> = line.chars().collect();
                let mut pieces = chars.chunks(max_len).peekable();
                while let Some(piece) = pieces.next() {
                    let piece: String = piece.iter().collect();
                    if pieces.peek().is_some() {
                        chunks.push(piece);
                    } else {
                        current = piece;
                    }
                }
            } else {
                current = line.to_string();
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Truncate text for log lines
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
