use std::fmt;

/// Which prompt template a generation call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Analyze,
    Ask,
    Study,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Analyze => "analyze",
            GenerationKind::Ask => "ask",
            GenerationKind::Study => "study",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for one commentary generation, built per request and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub reference: String,
    pub referenced_text: String,
    /// The question for `Ask`, the topic for `Study`.
    pub subject: Option<String>,
}

impl GenerationRequest {
    pub fn analyze(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: GenerationKind::Analyze,
            reference: reference.into(),
            referenced_text: text.into(),
            subject: None,
        }
    }

    pub fn ask(
        reference: impl Into<String>,
        text: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            kind: GenerationKind::Ask,
            reference: reference.into(),
            referenced_text: text.into(),
            subject: Some(question.into()),
        }
    }

    /// Study guides are topical; no passage is attached.
    pub fn study(topic: impl Into<String>) -> Self {
        Self {
            kind: GenerationKind::Study,
            reference: String::new(),
            referenced_text: String::new(),
            subject: Some(topic.into()),
        }
    }
}
