use bytes::{Buf, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult, Status};
use crate::message::Author;

/// Largest accepted frame, excluding the newline.
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

/// One line of an `AllAuthors` response body.
///
/// A stream is zero or more `Author` frames, optionally followed by a single
/// `Error` frame. An error frame is always the last one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFrame {
    Author(Author),
    Error(Status),
}

impl StreamFrame {
    /// Encode as one newline-terminated JSON line.
    pub fn encode(&self) -> ProtocolResult<Bytes> {
        let mut line = serde_json::to_vec(self)?;
        if line.len() > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: line.len(),
                max: MAX_FRAME_SIZE,
            });
        }
        line.push(b'\n');
        Ok(Bytes::from(line))
    }

    /// Decode a single line, without its terminator.
    pub fn decode(line: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(line)?)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Incremental decoder for a newline-delimited frame stream.
///
/// Body chunks are pushed as they arrive; frames are pulled out once a full
/// line is buffered. Blank lines are skipped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete frame, or `None` if more input is needed.
    pub fn next_frame(&mut self) -> ProtocolResult<Option<StreamFrame>> {
        loop {
            let Some(pos) = self.buf.iter().position(|b| *b == b'\n') else {
                if self.buf.len() > MAX_FRAME_SIZE {
                    return Err(ProtocolError::FrameTooLarge {
                        size: self.buf.len(),
                        max: MAX_FRAME_SIZE,
                    });
                }
                return Ok(None);
            };
            let line = self.buf.split_to(pos);
            self.buf.advance(1);
            let line = trim_cr(&line);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return StreamFrame::decode(line).map(Some);
        }
    }

    /// Decode whatever remains once the body has ended.
    ///
    /// A final frame without a trailing newline is accepted.
    pub fn finish(&mut self) -> ProtocolResult<Option<StreamFrame>> {
        if let Some(frame) = self.next_frame()? {
            return Ok(Some(frame));
        }
        let rest = self.buf.split();
        let rest = trim_cr(&rest);
        if rest.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        StreamFrame::decode(rest).map(Some)
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusCode;

    fn author(email: &str) -> Author {
        Author {
            id: "5ffed8580dfec66815713941".into(),
            email: email.into(),
            ..Author::default()
        }
    }

    #[test]
    fn frames_are_tagged_lines() {
        let line = StreamFrame::Author(author("a@x.com")).encode().unwrap();
        assert!(line.ends_with(b"\n"));
        let value: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(value["author"]["email"], "a@x.com");

        let line = StreamFrame::Error(Status::new(StatusCode::NotFound, "gone"))
            .encode()
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(value["error"]["code"], "NOT_FOUND");
    }

    #[test]
    fn decoder_handles_split_chunks() {
        let mut body = Vec::new();
        body.extend_from_slice(&StreamFrame::Author(author("a@x.com")).encode().unwrap());
        body.extend_from_slice(&StreamFrame::Author(author("b@x.com")).encode().unwrap());
        body.extend_from_slice(
            &StreamFrame::Error(Status::new(StatusCode::Internal, "boom"))
                .encode()
                .unwrap(),
        );

        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for chunk in body.chunks(7) {
            decoder.push(chunk);
            while let Some(frame) = decoder.next_frame().unwrap() {
                frames.push(frame);
            }
        }
        assert!(decoder.finish().unwrap().is_none());
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], StreamFrame::Author(author("b@x.com")));
        assert!(frames[2].is_error());
    }

    #[test]
    fn finish_accepts_unterminated_last_frame() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b"\n{\"author\":{\"email\":\"a@x.com\"}}");
        assert!(decoder.next_frame().unwrap().is_none());
        let frame = decoder.finish().unwrap().unwrap();
        match frame {
            StreamFrame::Author(a) => assert_eq!(a.email, "a@x.com"),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn malformed_line_is_an_error() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b"{not json}\n");
        assert!(matches!(
            decoder.next_frame().unwrap_err(),
            ProtocolError::Serialization(_)
        ));
    }

    #[test]
    fn oversized_partial_line_is_rejected() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&vec![b'x'; MAX_FRAME_SIZE + 1]);
        assert!(matches!(
            decoder.next_frame().unwrap_err(),
            ProtocolError::FrameTooLarge { .. }
        ));
    }
}
