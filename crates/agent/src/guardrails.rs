#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputDecision {
    Accept,
    Reject { reason_code: &'static str, user_message: String },
}

impl InputDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Checks chat input before it reaches the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputPolicy {
    pub max_input_chars: usize,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self { max_input_chars: 2_000 }
    }
}

impl InputPolicy {
    pub fn new(max_input_chars: usize) -> Self {
        Self { max_input_chars }
    }

    pub fn evaluate(&self, text: &str) -> InputDecision {
        if text.trim().is_empty() {
            return InputDecision::Reject {
                reason_code: "empty_input",
                user_message: "Digite uma pergunta antes de enviar.".to_string(),
            };
        }

        let length = text.chars().count();
        if length > self.max_input_chars {
            return InputDecision::Reject {
                reason_code: "input_too_long",
                user_message: format!(
                    "Sua mensagem tem {length} caracteres; o limite é {}.",
                    self.max_input_chars
                ),
            };
        }

        InputDecision::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::{InputDecision, InputPolicy};

    #[test]
    fn regular_question_is_accepted() {
        let policy = InputPolicy::default();
        assert_eq!(policy.evaluate("Como emprestar um notebook?"), InputDecision::Accept);
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        let policy = InputPolicy::default();
        for text in ["", "   ", "\n\t"] {
            let decision = policy.evaluate(text);
            let reason_code = match decision {
                InputDecision::Reject { reason_code, .. } => reason_code,
                InputDecision::Accept => "",
            };
            assert_eq!(reason_code, "empty_input", "input: {text:?}");
        }
    }

    #[test]
    fn over_long_input_is_rejected_with_limit_in_message() {
        let policy = InputPolicy::new(10);
        let decision = policy.evaluate("devolução de notebook");

        let (reason_code, user_message) = match decision {
            InputDecision::Reject { reason_code, user_message } => (reason_code, user_message),
            InputDecision::Accept => ("", String::new()),
        };

        assert_eq!(reason_code, "input_too_long");
        assert!(user_message.contains("o limite é 10"));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let policy = InputPolicy::new(9);
        assert!(policy.evaluate("devolução").is_accepted());
    }
}
