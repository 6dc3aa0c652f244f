use serde::{Deserialize, Serialize};

/// Role type for a conversation turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role.
    User,

    /// Model role.
    Model,
}

/// A single typed unit inside a content object. The Gemini API supports
/// several part kinds; this crate only sends and receives text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    /// The text payload of this part.
    pub text: String,
}

impl Part {
    /// Create a new text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One turn of a conversation: a role plus its parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// The role that authored this turn.
    pub role: Role,

    /// The parts making up this turn.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new `Content` with the given role and a single text part.
    pub fn new_with_text(text: impl Into<String>, role: Role) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a new user `Content` with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new_with_text(text, Role::User)
    }

    /// Create a new model `Content` with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new_with_text(text, Role::Model)
    }

    /// Concatenated text of all parts in this turn.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::user(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::user(text)
    }
}

/// The system instruction for a conversation. Serialized like a content
/// object but carries no role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemInstruction {
    /// The parts making up the instruction.
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    /// Create a system instruction from a single text string.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

impl From<&str> for SystemInstruction {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SystemInstruction {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn content_with_text() {
        let content = Content::user("Hello, Gemini!");
        let json = to_value(&content).unwrap();

        assert_eq!(
            json,
            json!({
                "role": "user",
                "parts": [{"text": "Hello, Gemini!"}]
            })
        );
    }

    #[test]
    fn content_roles() {
        assert_eq!(Content::user("hi").role, Role::User);
        assert_eq!(Content::model("hello").role, Role::Model);

        let content: Content = "from a str".into();
        assert_eq!(content.role, Role::User);
    }

    #[test]
    fn content_text_concatenates_parts() {
        let content = Content {
            role: Role::Model,
            parts: vec![Part::text("Hello, "), Part::text("world.")],
        };
        assert_eq!(content.text(), "Hello, world.");
    }

    #[test]
    fn content_deserialization() {
        let json = json!({
            "role": "model",
            "parts": [{"text": "Hi there"}]
        });

        let content: Content = serde_json::from_value(json).unwrap();
        assert_eq!(content.role, Role::Model);
        assert_eq!(content.text(), "Hi there");
    }

    #[test]
    fn system_instruction_has_no_role() {
        let instruction = SystemInstruction::new("Be brief.");
        let json = to_value(&instruction).unwrap();

        assert_eq!(json, json!({"parts": [{"text": "Be brief."}]}));
    }
}
