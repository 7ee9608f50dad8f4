use almox_core::inventory::InventoryContext;

use crate::rules::{normalize_text, render, RuleSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// `None` when the fallback answered.
    pub rule_id: Option<String>,
    pub text: String,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        self.rule_id.is_none()
    }
}

/// Maps free text to a canned reply. Pure: the same input and context always
/// produce the same reply, and every input produces one.
#[derive(Clone, Debug, Default)]
pub struct ResponseResolver {
    rules: RuleSet,
}

impl ResponseResolver {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn resolve(&self, text: &str, context: &InventoryContext) -> String {
        self.resolve_detailed(text, context).text
    }

    pub fn resolve_detailed(&self, text: &str, context: &InventoryContext) -> Resolution {
        let normalized_text = normalize_text(text);

        match self.rules.first_match(&normalized_text) {
            Some(rule) => Resolution {
                rule_id: Some(rule.id.clone()),
                text: render(&rule.template, context),
            },
            None => Resolution { rule_id: None, text: render(self.rules.fallback(), context) },
        }
    }
}

#[cfg(test)]
mod tests {
    use almox_core::inventory::InventoryContext;

    use super::ResponseResolver;
    use crate::rules::{render, Rule, RuleSet, DEFAULT_FALLBACK};

    fn dashboard_context() -> InventoryContext {
        InventoryContext {
            total: 24,
            available: 18,
            on_loan: 6,
            overdue: 2,
            notebooks_available: 7,
            mice_available: 4,
            keyboards_available: 3,
        }
    }

    fn resolver() -> ResponseResolver {
        ResponseResolver::default()
    }

    #[test]
    fn notebook_questions_get_notebook_counts() {
        let context = dashboard_context();
        for text in ["Tem notebook livre?", "preciso de um LAPTOP", "NoteBook Dell"] {
            let resolution = resolver().resolve_detailed(text, &context);
            assert_eq!(resolution.rule_id.as_deref(), Some("notebooks"), "input: {text}");
            assert!(resolution.text.starts_with("Temos 7 notebooks disponíveis"), "input: {text}");
        }
    }

    #[test]
    fn quantity_question_gets_aggregate_counts() {
        let reply =
            resolver().resolve("Quantos equipamentos temos disponíveis?", &dashboard_context());

        assert!(reply.contains("24 equipamentos cadastrados"));
        assert!(reply.contains("18 disponíveis"));
        assert!(reply.contains("6 emprestados"));
        assert!(reply.contains("2 empréstimos em atraso"));
    }

    #[test]
    fn aggregate_rule_wins_over_notebook_rule() {
        let resolution = resolver().resolve_detailed(
            "quantos equipamentos do tipo notebook existem?",
            &dashboard_context(),
        );
        assert_eq!(resolution.rule_id.as_deref(), Some("equipment_counts"));
    }

    #[test]
    fn quantity_word_alone_does_not_trigger_aggregate() {
        let resolution =
            resolver().resolve_detailed("quantos notebooks temos?", &dashboard_context());
        assert_eq!(resolution.rule_id.as_deref(), Some("notebooks"));
    }

    #[test]
    fn earlier_rule_wins_when_two_match() {
        // "emprestar" and "notebook" both match; notebooks is listed first.
        let resolution =
            resolver().resolve_detailed("Como emprestar um notebook?", &dashboard_context());
        assert_eq!(resolution.rule_id.as_deref(), Some("notebooks"));

        let resolution = resolver()
            .resolve_detailed("quero devolver o mouse e pedir ajuda", &dashboard_context());
        assert_eq!(resolution.rule_id.as_deref(), Some("peripherals"));
    }

    #[test]
    fn accented_triggers_match_case_insensitively() {
        let context = dashboard_context();
        let cases = [
            ("EMPRÉSTIMO urgente", "loan_howto"),
            ("Como faço a DEVOLUÇÃO?", "return_howto"),
            ("Onde leio o Código de Barras?", "scanner"),
            ("Preciso de um RELATÓRIO", "reports"),
            ("quero cadastrar um tablet", "register_equipment"),
            ("help", "help"),
        ];

        for (text, expected) in cases {
            let resolution = resolver().resolve_detailed(text, &context);
            assert_eq!(resolution.rule_id.as_deref(), Some(expected), "input: {text}");
        }
    }

    #[test]
    fn unmatched_input_returns_exact_fallback() {
        let context = dashboard_context();
        let resolution = resolver().resolve_detailed("xyzzy", &context);

        assert!(resolution.is_fallback());
        assert_eq!(resolution.text, render(DEFAULT_FALLBACK, &context));
        assert!(resolution.text.contains("temos 18 equipamentos disponíveis"));
    }

    #[test]
    fn empty_input_falls_through_to_fallback() {
        let context = dashboard_context();
        assert_eq!(resolver().resolve("", &context), render(DEFAULT_FALLBACK, &context));
        assert_eq!(resolver().resolve("   \n", &context), render(DEFAULT_FALLBACK, &context));
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = resolver();
        let context = dashboard_context();
        let first = resolver.resolve("Tem teclado sobrando?", &context);
        let second = resolver.resolve("Tem teclado sobrando?", &context);

        assert_eq!(first, second);
        assert!(first.contains("4 mouses e 3 teclados"));
    }

    #[test]
    fn replies_follow_the_supplied_context() {
        let resolver = resolver();
        let mut context = dashboard_context();
        context.available = 5;

        assert!(resolver.resolve("xyzzy", &context).contains("temos 5 equipamentos"));
    }

    #[test]
    fn custom_rule_order_is_respected() {
        let rules = RuleSet::new(
            vec![
                Rule::any("second_listed_first", &["b"], "B"),
                Rule::any("first_listed_second", &["a"], "A"),
            ],
            "?",
            None,
        )
        .expect("rules should build");
        let resolver = ResponseResolver::new(rules);

        assert_eq!(resolver.resolve("a b", &InventoryContext::default()), "B");
    }
}
