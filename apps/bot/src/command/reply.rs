/// What a command sends back: text, optionally with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub file: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file: None,
        }
    }

    pub fn with_file(content: impl Into<String>, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content: content.into(),
            file: Some(Attachment {
                name: name.into(),
                bytes,
            }),
        }
    }
}
