use almox_core::domain::chat::{Author, ChatMessage, MessageId};
use chrono::Utc;

/// Append-only message log. Ids start at 1 and only grow.
#[derive(Clone, Debug)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self { messages: Vec::new(), next_id: 1 }
    }

    pub fn append(
        &mut self,
        author: Author,
        text: impl Into<String>,
        rule_id: Option<String>,
    ) -> ChatMessage {
        let message = ChatMessage {
            id: MessageId(self.next_id),
            author,
            text: text.into(),
            rule_id,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use almox_core::domain::chat::{Author, MessageId};

    use super::Transcript;

    #[test]
    fn ids_start_at_one_and_strictly_increase() {
        let mut transcript = Transcript::new();
        let first = transcript.append(Author::Assistant, "Olá!", None);
        let second = transcript.append(Author::User, "ajuda", None);
        let third = transcript.append(Author::Assistant, "Posso ajudar", Some("help".to_string()));

        assert_eq!(first.id, MessageId(1));
        assert!(first.id < second.id && second.id < third.id);
        assert!(first.created_at <= third.created_at);
    }

    #[test]
    fn messages_keep_submission_order() {
        let mut transcript = Transcript::new();
        transcript.append(Author::User, "um", None);
        transcript.append(Author::Assistant, "dois", None);

        let texts = transcript.messages().iter().map(|m| m.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["um", "dois"]);
        assert!(transcript.messages()[0].is_from_user());
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("dois"));
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn new_transcript_is_empty() {
        let transcript = Transcript::default();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }
}
