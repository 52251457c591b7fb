use std::cell::RefCell;
use std::rc::Rc;

use crate::builder::TargetBuilder;
use crate::field::{ConfigField, FieldKind};
use crate::session::{Session, SETUP_FINISHED, STEP_ANNOUNCEMENT};
use crate::suggest::{Completion, SuggestionProvider};

/// One stage of the setup sequence. The chain is built once, up front, and
/// only ever walked forward; `handle_input` hands back the step to show
/// next.
#[derive(Debug)]
pub enum SetupStep {
    Field(FieldStep),
    Terminal(TerminalStep),
}

impl SetupStep {
    /// Consumes one line of raw input and returns the step to transition
    /// to. Never fails: input the field rejects is dropped and the wizard
    /// moves on anyway. The terminal step returns itself.
    pub fn handle_input(
        self: Rc<Self>,
        session: &mut dyn Session,
        target: &mut TargetBuilder,
        raw: &str,
    ) -> Rc<SetupStep> {
        if let SetupStep::Field(step) = &*self {
            return step.handle_input(session, target, raw);
        }
        self
    }

    /// Schema-supplied candidate values for this step. Empty once the
    /// wizard is finished.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            SetupStep::Field(step) => step.suggestions(),
            SetupStep::Terminal(_) => Vec::new(),
        }
    }

    pub fn default_value(&self) -> Option<String> {
        match self {
            SetupStep::Field(step) => step.default_value(),
            SetupStep::Terminal(_) => None,
        }
    }

    pub fn announce(&self, session: &mut dyn Session) {
        match self {
            SetupStep::Field(step) => step.announce(session),
            SetupStep::Terminal(step) => step.announce(session),
        }
    }

    pub fn create_suggestions(
        &self,
        provider: &dyn SuggestionProvider,
        partial: &str,
    ) -> Vec<Completion> {
        match self {
            SetupStep::Field(step) => step.create_suggestions(provider, partial),
            SetupStep::Terminal(_) => Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SetupStep::Terminal(_))
    }

    pub fn field_step(&self) -> Option<&FieldStep> {
        match self {
            SetupStep::Field(step) => Some(step),
            SetupStep::Terminal(_) => None,
        }
    }
}

/// A step bound to one configuration field and to its fixed successor.
#[derive(Debug)]
pub struct FieldStep {
    field: Rc<RefCell<ConfigField>>,
    index: usize,
    next: Rc<SetupStep>,
}

impl FieldStep {
    pub fn field(&self) -> &Rc<RefCell<ConfigField>> {
        &self.field
    }

    /// Zero-based position in the schema's field list. Display only.
    pub fn index(&self) -> usize {
        self.index
    }

    #[allow(dead_code)]
    pub fn next(&self) -> &Rc<SetupStep> {
        &self.next
    }

    pub fn handle_input(
        &self,
        _session: &mut dyn Session,
        _target: &mut TargetBuilder,
        raw: &str,
    ) -> Rc<SetupStep> {
        {
            let mut field = self.field.borrow_mut();
            if field.is_valid(raw) {
                field.set_value(raw);
            }
        }
        Rc::clone(&self.next)
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.field.borrow().suggestions().to_vec()
    }

    pub fn default_value(&self) -> Option<String> {
        self.field.borrow().default_text()
    }

    /// Emits the single step announcement: 1-based ordinal, description,
    /// kind tag and textual default.
    pub fn announce(&self, session: &mut dyn Session) {
        let field = self.field.borrow();
        session.send_message(
            STEP_ANNOUNCEMENT,
            &[
                ("step", (self.index + 1).to_string()),
                ("description", field.describe().to_string()),
                ("type", field.kind().tag().to_string()),
                (
                    "value",
                    field.default_text().unwrap_or_else(|| "none".to_string()),
                ),
            ],
        );
    }

    pub fn create_suggestions(
        &self,
        provider: &dyn SuggestionProvider,
        partial: &str,
    ) -> Vec<Completion> {
        let field = self.field.borrow();
        match field.kind() {
            FieldKind::BlockBucket => provider.complete_patterns(partial),
            FieldKind::Integer => {
                if let Some(default) = field.default_text() {
                    if default.starts_with(partial) {
                        return vec![Completion::new(default)];
                    }
                }
                // A non-matching integer default falls back to the boolean
                // candidates. Kept as-is; see DESIGN.md.
                provider.complete_boolean(partial)
            }
            FieldKind::Boolean => provider.complete_boolean(partial),
            FieldKind::Text => Vec::new(),
        }
    }
}

/// The externally supplied end of the chain; reached after every field has
/// been visited.
#[derive(Debug)]
pub struct TerminalStep {
    target: String,
}

impl TerminalStep {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn announce(&self, session: &mut dyn Session) {
        session.send_message(SETUP_FINISHED, &[("target", self.target.clone())]);
    }
}

/// Builds the whole chain in one eager pass, right to left: the terminal
/// step first, then each field step prepended with its successor already in
/// place. An empty field list yields the terminal step itself.
pub fn build_chain(
    fields: &[Rc<RefCell<ConfigField>>],
    terminal: Rc<SetupStep>,
) -> Rc<SetupStep> {
    let mut next = terminal;
    for (index, field) in fields.iter().enumerate().rev() {
        next = Rc::new(SetupStep::Field(FieldStep {
            field: Rc::clone(field),
            index,
            next,
        }));
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageLog;

    fn field(kind: FieldKind, default: Option<&str>) -> Rc<RefCell<ConfigField>> {
        Rc::new(RefCell::new(ConfigField::new(
            "wall.height",
            "Height of the wall",
            kind,
            default.map(str::to_string),
            vec!["1".to_string(), "2".to_string()],
        )))
    }

    fn terminal() -> Rc<SetupStep> {
        Rc::new(SetupStep::Terminal(TerminalStep::new("plotworld")))
    }

    fn builder() -> TargetBuilder {
        TargetBuilder::new("plotworld", Vec::new())
    }

    /// Provider whose outputs prove which completion path was taken.
    struct MarkerProvider;

    impl SuggestionProvider for MarkerProvider {
        fn complete_patterns(&self, partial: &str) -> Vec<Completion> {
            vec![Completion::new(format!("pattern:{}", partial))]
        }

        fn complete_boolean(&self, partial: &str) -> Vec<Completion> {
            vec![Completion::new(format!("boolean:{}", partial))]
        }
    }

    #[test]
    fn test_chain_reaches_terminal_after_one_input_per_field() {
        let fields = vec![
            field(FieldKind::Integer, Some("4")),
            field(FieldKind::Boolean, None),
            field(FieldKind::Text, None),
        ];
        let end = terminal();
        let mut log = MessageLog::new();
        let mut target = builder();

        let mut current = build_chain(&fields, Rc::clone(&end));
        // Second input is invalid for its field; the chain advances anyway.
        for raw in ["8", "not-a-bool", "road"] {
            assert!(!current.is_terminal());
            current = current.handle_input(&mut log, &mut target, raw);
        }
        assert!(Rc::ptr_eq(&current, &end));
    }

    #[test]
    fn test_step_indices_follow_field_order() {
        let fields = vec![
            field(FieldKind::Integer, None),
            field(FieldKind::Integer, None),
            field(FieldKind::Integer, None),
        ];
        let mut current = build_chain(&fields, terminal());
        let mut expected = 0;
        while let Some(step) = current.field_step() {
            assert_eq!(step.index(), expected);
            expected += 1;
            let next = Rc::clone(step.next());
            current = next;
        }
        assert_eq!(expected, fields.len());
    }

    #[test]
    fn test_last_step_successor_is_the_supplied_terminal() {
        let fields = vec![field(FieldKind::Integer, None), field(FieldKind::Text, None)];
        let end = terminal();
        let mut current = build_chain(&fields, Rc::clone(&end));
        while let Some(step) = current.field_step() {
            let next = Rc::clone(step.next());
            if next.is_terminal() {
                assert!(Rc::ptr_eq(&next, &end));
            }
            current = next;
        }
        assert!(Rc::ptr_eq(&current, &end));
    }

    #[test]
    fn test_empty_field_list_degenerates_to_terminal() {
        let end = terminal();
        let first = build_chain(&[], Rc::clone(&end));
        assert!(Rc::ptr_eq(&first, &end));
    }

    #[test]
    fn test_invalid_input_is_absorbed_and_still_advances() {
        let f = field(FieldKind::Integer, Some("4"));
        let end = terminal();
        let first = build_chain(std::slice::from_ref(&f), Rc::clone(&end));

        let next = first.handle_input(&mut MessageLog::new(), &mut builder(), "x");
        assert!(Rc::ptr_eq(&next, &end));
        assert_eq!(f.borrow().value(), None);
        assert_eq!(f.borrow().effective_value(), Some("4".to_string()));
    }

    #[test]
    fn test_valid_input_commits_into_the_shared_field() {
        let f = field(FieldKind::Integer, Some("4"));
        let end = terminal();
        let first = build_chain(std::slice::from_ref(&f), Rc::clone(&end));

        let next = first.handle_input(&mut MessageLog::new(), &mut builder(), "42");
        assert!(Rc::ptr_eq(&next, &end));
        assert_eq!(f.borrow().value(), Some("42"));
    }

    #[test]
    fn test_terminal_absorbs_input_and_stays_put() {
        let end = terminal();
        let next = Rc::clone(&end).handle_input(&mut MessageLog::new(), &mut builder(), "extra");
        assert!(Rc::ptr_eq(&next, &end));
    }

    #[test]
    fn test_boolean_step_delegates_to_boolean_completion() {
        let first = build_chain(&[field(FieldKind::Boolean, None)], terminal());
        let completions = first.create_suggestions(&MarkerProvider, "t");
        assert_eq!(completions, vec![Completion::new("boolean:t")]);
    }

    #[test]
    fn test_pattern_step_delegates_to_pattern_completion() {
        let first = build_chain(&[field(FieldKind::BlockBucket, None)], terminal());
        let completions = first.create_suggestions(&MarkerProvider, "sto");
        assert_eq!(completions, vec![Completion::new("pattern:sto")]);
    }

    #[test]
    fn test_integer_step_offers_matching_default() {
        let first = build_chain(&[field(FieldKind::Integer, Some("10"))], terminal());
        let completions = first.create_suggestions(&MarkerProvider, "1");
        assert_eq!(completions, vec![Completion::new("10")]);
    }

    #[test]
    fn test_integer_step_without_match_falls_back_to_boolean_completion() {
        let first = build_chain(&[field(FieldKind::Integer, Some("10"))], terminal());
        let completions = first.create_suggestions(&MarkerProvider, "9");
        assert_eq!(completions, vec![Completion::new("boolean:9")]);
    }

    #[test]
    fn test_text_step_completes_to_nothing() {
        let first = build_chain(&[field(FieldKind::Text, None)], terminal());
        assert!(first.create_suggestions(&MarkerProvider, "any").is_empty());
    }

    #[test]
    fn test_step_suggestions_come_from_the_field() {
        let first = build_chain(&[field(FieldKind::Integer, None)], terminal());
        assert_eq!(first.suggestions(), vec!["1".to_string(), "2".to_string()]);
        assert!(terminal().suggestions().is_empty());
    }

    #[test]
    fn test_announce_fills_all_four_slots() {
        let first = build_chain(&[field(FieldKind::Integer, Some("10"))], terminal());
        let mut log = MessageLog::new();
        first.announce(&mut log);
        assert_eq!(
            log.last(),
            Some("[1] Height of the wall (type: INTEGER, default: 10)")
        );
        assert_eq!(log.messages().len(), 1);
    }

    #[test]
    fn test_announce_without_default_reports_none() {
        let first = build_chain(&[field(FieldKind::Boolean, None)], terminal());
        let mut log = MessageLog::new();
        first.announce(&mut log);
        assert_eq!(
            log.last(),
            Some("[1] Height of the wall (type: BOOLEAN, default: none)")
        );
    }

    #[test]
    fn test_terminal_announce_names_the_target() {
        let mut log = MessageLog::new();
        terminal().announce(&mut log);
        assert_eq!(log.last(), Some("All values collected for plotworld"));
    }
}
