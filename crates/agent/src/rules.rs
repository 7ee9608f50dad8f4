//! Ordered keyword rules and their reply templates.
//!
//! A [`RuleSet`] is plain data: rules are evaluated top to bottom and the first
//! match wins, so precedence is the position in the list. Templates reference
//! [`InventoryContext`] values as `{{name}}` and are checked when the set is
//! built, which keeps rendering infallible.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use almox_core::errors::ApplicationError;
use almox_core::inventory::InventoryContext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// At least one trigger must occur in the input.
    #[default]
    Any,
    /// Every trigger must occur in the input.
    All,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub mode: MatchMode,
    pub triggers: Vec<String>,
    pub template: String,
}

impl Rule {
    pub fn any(id: &str, triggers: &[&str], template: &str) -> Self {
        Self::with_mode(id, MatchMode::Any, triggers, template)
    }

    pub fn all(id: &str, triggers: &[&str], template: &str) -> Self {
        Self::with_mode(id, MatchMode::All, triggers, template)
    }

    fn with_mode(id: &str, mode: MatchMode, triggers: &[&str], template: &str) -> Self {
        Self {
            id: id.to_string(),
            mode,
            triggers: triggers.iter().map(|trigger| (*trigger).to_string()).collect(),
            template: template.to_string(),
        }
    }

    /// `normalized_input` must already be lowercased.
    pub fn matches(&self, normalized_input: &str) -> bool {
        let mut triggers = self.triggers.iter();
        match self.mode {
            MatchMode::Any => triggers.any(|trigger| normalized_input.contains(trigger.as_str())),
            MatchMode::All => triggers.all(|trigger| normalized_input.contains(trigger.as_str())),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("rule `{0}` has no triggers")]
    EmptyTriggers(String),
    #[error("rule `{0}` has a blank trigger")]
    BlankTrigger(String),
    #[error("rule id must not be empty")]
    EmptyId,
    #[error("duplicate rule id `{0}`")]
    DuplicateId(String),
    #[error("template for `{owner}` references unknown placeholder `{name}`")]
    UnknownPlaceholder { owner: String, name: String },
    #[error("template for `{0}` has an unterminated placeholder")]
    UnterminatedPlaceholder(String),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: String,
    greeting: Option<String>,
}

impl RuleSet {
    pub fn new(
        rules: Vec<Rule>,
        fallback: impl Into<String>,
        greeting: Option<String>,
    ) -> Result<Self, RuleSetError> {
        let fallback = fallback.into();
        let mut seen_ids = BTreeSet::new();
        let mut normalized_rules = Vec::with_capacity(rules.len());

        for mut rule in rules {
            if rule.id.trim().is_empty() {
                return Err(RuleSetError::EmptyId);
            }
            if !seen_ids.insert(rule.id.clone()) {
                return Err(RuleSetError::DuplicateId(rule.id));
            }
            if rule.triggers.is_empty() {
                return Err(RuleSetError::EmptyTriggers(rule.id));
            }
            if rule.triggers.iter().any(|trigger| trigger.trim().is_empty()) {
                return Err(RuleSetError::BlankTrigger(rule.id));
            }
            check_placeholders(&rule.id, &rule.template)?;

            rule.triggers = rule.triggers.iter().map(|trigger| normalize_text(trigger)).collect();
            normalized_rules.push(rule);
        }

        check_placeholders("fallback", &fallback)?;
        if let Some(greeting) = &greeting {
            check_placeholders("greeting", greeting)?;
        }

        Ok(Self { rules: normalized_rules, fallback, greeting })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RuleSetError> {
        let file: RuleSetFile = toml::from_str(raw)?;
        Self::new(file.rules, file.fallback, file.greeting)
    }

    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|error| ApplicationError::RulesLoad {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        Self::from_toml_str(&raw).map_err(|error| ApplicationError::RulesLoad {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }

    pub fn first_match(&self, normalized_input: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(normalized_input))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        default_rule_set()
    }
}

#[derive(Debug, Deserialize)]
struct RuleSetFile {
    #[serde(default)]
    rules: Vec<Rule>,
    fallback: String,
    #[serde(default)]
    greeting: Option<String>,
}

pub const DEFAULT_GREETING: &str = "Olá! Sou seu assistente de TI. Como posso ajudar você hoje? Posso auxiliar com informações sobre equipamentos, empréstimos, devoluções e procedimentos do sistema.";

pub const DEFAULT_FALLBACK: &str = "Entendi sua pergunta. No momento temos {{available}} equipamentos disponíveis. Para uma resposta mais específica, posso ajudar com informações sobre equipamentos, empréstimos, devoluções, scanner de código de barras, cadastros ou relatórios. Sobre qual dessas áreas você gostaria de saber mais?";

/// Built-in help-desk table. The counts question is listed first so that
/// "quantos notebooks/equipamentos" style questions get the aggregate answer.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::all(
            "equipment_counts",
            &["quantos", "equipamento"],
            "Atualmente temos {{total}} equipamentos cadastrados: {{available}} disponíveis, {{on_loan}} emprestados e {{overdue}} empréstimos em atraso. Consulte as seções \"Equipamentos\" e \"Empréstimos\" para ver os detalhes.",
        ),
        Rule::any(
            "notebooks",
            &["notebook", "laptop"],
            "Temos {{notebooks_available}} notebooks disponíveis no momento. Para emprestar um notebook, vá até a seção \"Empréstimos\" e selecione o equipamento desejado. Você precisará informar o usuário responsável e a data prevista de devolução.",
        ),
        Rule::any(
            "peripherals",
            &["mouse", "teclado"],
            "Nosso estoque atual inclui {{mice_available}} mouses e {{keyboards_available}} teclados disponíveis. Estes acessórios podem ser emprestados através do sistema. Posso ajudar com o processo de empréstimo?",
        ),
        Rule::any(
            "loan_howto",
            &["empréstimo", "emprestar"],
            "Para fazer um empréstimo: 1) Acesse a seção \"Empréstimos\", 2) Clique em \"Novo Empréstimo\", 3) Escaneie ou digite o código do equipamento, 4) Informe os dados do usuário, 5) Confirme a operação.",
        ),
        Rule::any(
            "return_howto",
            &["devolução", "devolver"],
            "Para registrar uma devolução: 1) Acesse \"Empréstimos\", 2) Encontre o empréstimo ativo, 3) Clique em \"Devolver\", 4) Verifique o estado do equipamento, 5) Confirme a devolução.",
        ),
        Rule::any(
            "scanner",
            &["scanner", "código de barras"],
            "O scanner de código de barras está disponível na seção \"Scanner\". Você pode usar a câmera do dispositivo para ler códigos de barras dos equipamentos e acessar rapidamente suas informações.",
        ),
        Rule::any(
            "reports",
            &["relatório", "gráfico"],
            "Os relatórios e gráficos estão disponíveis na seção \"Gráficos\". Lá você pode visualizar estatísticas por setor, status dos equipamentos e outras métricas importantes.",
        ),
        Rule::any(
            "register_equipment",
            &["cadastrar", "adicionar"],
            "Para cadastrar novos equipamentos: 1) Vá para \"Equipamentos\", 2) Clique em \"Adicionar Equipamento\", 3) Preencha todas as informações necessárias, 4) Gere ou insira o código de barras, 5) Salve o cadastro.",
        ),
        Rule::any(
            "help",
            &["ajuda", "help"],
            "Posso ajudar com: \n• Informações sobre equipamentos disponíveis\n• Processo de empréstimo e devolução\n• Como usar o scanner de código de barras\n• Cadastro de novos equipamentos\n• Consulta de relatórios\n\nQual dessas opções você gostaria de saber mais?",
        ),
    ]
}

pub fn default_rule_set() -> RuleSet {
    RuleSet {
        rules: default_rules()
            .into_iter()
            .map(|mut rule| {
                rule.triggers =
                    rule.triggers.iter().map(|trigger| normalize_text(trigger)).collect();
                rule
            })
            .collect(),
        fallback: DEFAULT_FALLBACK.to_string(),
        greeting: Some(DEFAULT_GREETING.to_string()),
    }
}

/// Replaces every `{{name}}` with the matching context value.
pub fn render(template: &str, context: &InventoryContext) -> String {
    let mut output = template.to_string();
    for (name, value) in context.variables() {
        output = output.replace(&format!("{{{{{name}}}}}"), &value.to_string());
    }
    output
}

pub(crate) fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

fn check_placeholders(owner: &str, template: &str) -> Result<(), RuleSetError> {
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            return Err(RuleSetError::UnterminatedPlaceholder(owner.to_string()));
        };
        let name = &after_open[..end];
        if !InventoryContext::VARIABLES.contains(&name) {
            return Err(RuleSetError::UnknownPlaceholder {
                owner: owner.to_string(),
                name: name.to_string(),
            });
        }
        rest = &after_open[end + 2..];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use almox_core::errors::ApplicationError;
    use almox_core::inventory::InventoryContext;
    use tempfile::TempDir;

    use super::{
        default_rule_set, default_rules, render, MatchMode, Rule, RuleSet, RuleSetError,
        DEFAULT_FALLBACK, DEFAULT_GREETING,
    };

    #[test]
    fn built_in_table_passes_validation() {
        let validated = RuleSet::new(
            default_rules(),
            DEFAULT_FALLBACK,
            Some(DEFAULT_GREETING.to_string()),
        )
        .expect("built-in rules should validate");

        assert_eq!(validated, default_rule_set());
        assert_eq!(validated.rules()[0].id, "equipment_counts");
        assert_eq!(validated.rules()[0].mode, MatchMode::All);
    }

    #[test]
    fn any_mode_needs_one_trigger() {
        let rule = Rule::any("notebooks", &["notebook", "laptop"], "x");
        assert!(rule.matches("preciso de um laptop"));
        assert!(!rule.matches("preciso de um tablet"));
    }

    #[test]
    fn all_mode_needs_every_trigger() {
        let rule = Rule::all("equipment_counts", &["quantos", "equipamento"], "x");
        assert!(rule.matches("quantos equipamentos temos?"));
        assert!(!rule.matches("quantos notebooks temos?"));
        assert!(!rule.matches("lista de equipamentos"));
    }

    #[test]
    fn triggers_are_lowercased_on_construction() {
        let rules = RuleSet::new(vec![Rule::any("scan", &["Código de Barras"], "ok")], "?", None)
            .expect("rule set should build");

        assert_eq!(rules.rules()[0].triggers, vec!["código de barras".to_string()]);
        assert!(rules.first_match("onde fica o código de barras?").is_some());
    }

    #[test]
    fn render_substitutes_known_values() {
        let context = InventoryContext { total: 24, available: 18, ..InventoryContext::default() };
        assert_eq!(
            render("{{available}} de {{total}} livres", &context),
            "18 de 24 livres".to_string()
        );
    }

    #[test]
    fn rejects_rule_without_triggers() {
        let error = RuleSet::new(vec![Rule::all("broken", &[], "x")], "?", None)
            .expect_err("empty conjunctive rule would match everything");
        assert!(matches!(error, RuleSetError::EmptyTriggers(ref id) if id == "broken"));
    }

    #[test]
    fn rejects_blank_trigger() {
        let error = RuleSet::new(vec![Rule::any("blank", &["  "], "x")], "?", None)
            .expect_err("blank trigger matches everything");
        assert!(matches!(error, RuleSetError::BlankTrigger(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = RuleSet::new(
            vec![Rule::any("help", &["ajuda"], "a"), Rule::any("help", &["help"], "b")],
            "?",
            None,
        )
        .expect_err("duplicate id");
        assert!(matches!(error, RuleSetError::DuplicateId(ref id) if id == "help"));
    }

    #[test]
    fn rejects_unknown_placeholder_in_fallback() {
        let error =
            RuleSet::new(Vec::new(), "temos {{tablets}} tablets", None).expect_err("bad name");
        assert!(matches!(
            error,
            RuleSetError::UnknownPlaceholder { ref owner, ref name }
                if owner == "fallback" && name == "tablets"
        ));
    }

    #[test]
    fn rejects_unterminated_placeholder() {
        let error = RuleSet::new(vec![Rule::any("x", &["x"], "temos {{total")], "?", None)
            .expect_err("unterminated");
        assert!(matches!(error, RuleSetError::UnterminatedPlaceholder(_)));
    }

    #[test]
    fn parses_rule_file() {
        let rules = RuleSet::from_toml_str(
            r#"
fallback = "Não entendi. Temos {{available}} itens livres."

[[rules]]
id = "counts"
mode = "all"
triggers = ["quantos", "itens"]
template = "{{total}} itens no total"

[[rules]]
id = "help"
triggers = ["AJUDA"]
template = "Posso ajudar!"
"#,
        )
        .expect("rule file should parse");

        assert_eq!(rules.rules().len(), 2);
        assert_eq!(rules.rules()[1].mode, MatchMode::Any);
        assert_eq!(rules.rules()[1].triggers, vec!["ajuda".to_string()]);
        assert!(rules.greeting().is_none());
    }

    #[test]
    fn rule_file_without_fallback_is_a_parse_error() {
        let raw = "[[rules]]\nid = \"x\"\ntriggers = [\"x\"]\ntemplate = \"x\"\n";
        let error = RuleSet::from_toml_str(raw).expect_err("fallback is required");
        assert!(matches!(error, RuleSetError::Parse(_)));
    }

    #[test]
    fn load_reports_the_offending_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("rules.toml");
        fs::write(&path, "fallback = \"{{nope}}\"\n").expect("write rules");

        let error = RuleSet::load(&path).expect_err("unknown placeholder");
        assert!(matches!(error, ApplicationError::RulesLoad { .. }));
        assert!(error.to_string().contains("rules.toml"));
    }
}
