//! Reassembly of protocol lines from arbitrary chunk boundaries.

/// Accumulates raw text fragments and yields complete newline-terminated
/// lines, carrying the incomplete tail across chunk boundaries.
///
/// Splitting is strictly on `\n` (a trailing `\r` is stripped); a line that
/// arrives split across two chunks is reassembled byte-for-byte before
/// being handed to the decoder.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return all lines it completes, in order.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.pending.find('\n') {
            let line = self.pending[..newline_pos]
                .trim_end_matches('\r')
                .to_string();
            self.pending.drain(..=newline_pos);
            lines.push(line);
        }
        lines
    }

    /// Take the final unterminated line, if any.
    ///
    /// Called once at end of stream; after this the buffer is empty.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_lines_are_split_in_order() {
        let mut buf = LineBuffer::new();
        let lines = buf.push("one\ntwo\nthree\n");
        assert_eq!(lines, vec!["one", "two", "three"]);
        assert!(buf.flush().is_none());
    }

    #[test]
    fn partial_line_carries_across_chunks() {
        let mut buf = LineBuffer::new();
        assert!(buf.push("data: Hel").is_empty());
        let lines = buf.push("lo\ndata: Wo");
        assert_eq!(lines, vec!["data: Hello"]);
        assert_eq!(buf.push("rld\n"), vec!["data: World"]);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push("data: hi\r\n"), vec!["data: hi"]);
    }

    #[test]
    fn flush_returns_unterminated_tail_once() {
        let mut buf = LineBuffer::new();
        buf.push("data: tail");
        assert_eq!(buf.flush().as_deref(), Some("data: tail"));
        assert!(buf.flush().is_none());
    }

    #[test]
    fn byte_at_a_time_matches_single_push() {
        let input = "data: a\ndata: b\ndata: c\n";

        let mut whole = LineBuffer::new();
        let expected = whole.push(input);

        let mut split = LineBuffer::new();
        let mut collected = Vec::new();
        for ch in input.chars() {
            collected.extend(split.push(&ch.to_string()));
        }
        assert_eq!(collected, expected);
    }
}
