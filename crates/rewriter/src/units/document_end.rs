use super::ContentType;
use super::mutations::encode_content;
use crate::shared::AsciiCompatibleEncoding;

/// The end of the document, passed to document `end` handlers once all
/// input has been written out.
#[derive(Debug)]
pub struct DocumentEnd {
    content: Vec<u8>,
    encoding: AsciiCompatibleEncoding,
}

impl DocumentEnd {
    pub(crate) fn new(encoding: AsciiCompatibleEncoding) -> Self {
        Self {
            content: Vec::new(),
            encoding,
        }
    }

    /// Append content to the end of the output.
    pub fn append(&mut self, content: &str, content_type: ContentType) {
        let bytes = encode_content(content, content_type, self.encoding, true);
        self.content.extend_from_slice(&bytes);
    }

    pub(crate) fn into_content(self) -> Vec<u8> {
        self.content
    }
}
