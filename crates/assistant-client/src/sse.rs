//! Incremental decoder for newline-delimited SSE frames.
//!
//! Chunks arrive at arbitrary byte boundaries, so the decoder buffers input
//! until a blank-line delimiter completes a record. A partial record left in
//! the buffer at end of stream is truncation and is never surfaced as data.

/// One delimited record from an event-stream response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Value of the optional `event:` field.
    pub event: Option<String>,
    /// Concatenated `data:` field payload.
    pub data: String,
}

/// Stateful frame decoder fed with raw byte chunks.
#[derive(Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Feeds one chunk of bytes and returns every frame it completed, in
    /// receipt order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some((end, delim_len)) = next_boundary(&self.buf) {
            let record: Vec<u8> = self.buf.drain(..end + delim_len).take(end).collect();
            if let Some(frame) = parse_record(&record) {
                frames.push(frame);
            }
        }
        frames
    }
}

/// Finds the next record delimiter (blank line), returning its offset and
/// byte length.
fn next_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < buf.len() {
        match &buf[i..] {
            [b'\r', b'\n', b'\r', b'\n', ..] => return Some((i, 4)),
            [b'\n', b'\n', ..] => return Some((i, 2)),
            _ => i += 1,
        }
    }
    None
}

fn parse_record(bytes: &[u8]) -> Option<Frame> {
    let text = String::from_utf8_lossy(bytes);
    let mut event: Option<String> = None;
    let mut data: Option<String> = None;
    for line in text.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match name {
            "event" => event = Some(value.to_string()),
            "data" => match &mut data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => data = Some(value.to_string()),
            },
            _ => {}
        }
    }
    if event.is_none() && data.is_none() {
        return None;
    }
    Some(Frame {
        event,
        data: data.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassembles_frame_split_across_chunks() {
        let mut decoder = FrameDecoder::default();
        assert!(decoder.feed(b"data: {\"type\":\"work").is_empty());
        let frames = decoder.feed(b"ing\",\"label\":\"Fetching\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"type\":\"working\",\"label\":\"Fetching\"}");
        assert_eq!(frames[0].event, None);
    }

    #[test]
    fn splits_multiple_frames_in_one_chunk() {
        let mut decoder = FrameDecoder::default();
        let frames = decoder.feed(b"data: one\n\ndata: two\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data, "one");
        assert_eq!(frames[1].data, "two");
    }

    #[test]
    fn handles_crlf_delimiters() {
        let mut decoder = FrameDecoder::default();
        let frames = decoder.feed(b"event: message\r\ndata: hello\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event.as_deref(), Some("message"));
        assert_eq!(frames[0].data, "hello");
    }

    #[test]
    fn joins_multiple_data_lines_with_newline() {
        let mut decoder = FrameDecoder::default();
        let frames = decoder.feed(b"data: first\ndata: second\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "first\nsecond");
    }

    #[test]
    fn ignores_comment_only_records() {
        let mut decoder = FrameDecoder::default();
        assert!(decoder.feed(b": keep-alive\n\n").is_empty());
        let frames = decoder.feed(b": ping\ndata: real\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "real");
    }

    #[test]
    fn survives_chunk_split_inside_multibyte_codepoint() {
        let bytes = "data: r\u{e9}sum\u{e9}\n\n".as_bytes();
        // split in the middle of the two-byte 'é'
        let split = bytes.iter().position(|&b| b == 0xc3).unwrap() + 1;
        let mut decoder = FrameDecoder::default();
        assert!(decoder.feed(&bytes[..split]).is_empty());
        let frames = decoder.feed(&bytes[split..]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "r\u{e9}sum\u{e9}");
    }

    #[test]
    fn partial_trailing_record_is_never_surfaced() {
        let mut decoder = FrameDecoder::default();
        assert!(decoder.feed(b"data: truncated").is_empty());
        // no further input arrives; the buffered bytes stay unreported
    }
}
