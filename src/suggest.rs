/// A candidate literal offered to the operator before they submit input.
/// Display-only; it carries nothing but the suggested text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    literal: String,
}

impl Completion {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

/// Produces completion candidates for the two field kinds that have a
/// known value space (booleans and block patterns).
pub trait SuggestionProvider {
    fn complete_patterns(&self, partial: &str) -> Vec<Completion>;
    fn complete_boolean(&self, partial: &str) -> Vec<Completion>;
}

const BLOCK_PALETTE: &[&str] = &[
    "andesite",
    "bedrock",
    "birch_planks",
    "bricks",
    "cobblestone",
    "diorite",
    "dirt",
    "glass",
    "granite",
    "grass_block",
    "gravel",
    "oak_planks",
    "quartz_block",
    "sand",
    "sandstone",
    "snow_block",
    "spruce_planks",
    "stone",
    "stone_bricks",
    "terracotta",
];

/// Built-in completions over a fixed block palette.
#[derive(Debug, Clone)]
pub struct StandardCompletions {
    palette: Vec<String>,
}

impl Default for StandardCompletions {
    fn default() -> Self {
        Self {
            palette: BLOCK_PALETTE.iter().map(|b| b.to_string()).collect(),
        }
    }
}

impl SuggestionProvider for StandardCompletions {
    fn complete_patterns(&self, partial: &str) -> Vec<Completion> {
        // Complete only the entry being typed; earlier entries and any
        // weight prefix are kept as-is.
        let (head, tail) = match partial.rfind(',') {
            Some(i) => partial.split_at(i + 1),
            None => ("", partial),
        };
        let (weight, stem) = match tail.find('%') {
            Some(i) if i > 0 && tail[..i].chars().all(|c| c.is_ascii_digit()) => {
                tail.split_at(i + 1)
            }
            _ => ("", tail),
        };

        self.palette
            .iter()
            .filter(|block| block.starts_with(stem))
            .map(|block| Completion::new(format!("{}{}{}", head, weight, block)))
            .collect()
    }

    fn complete_boolean(&self, partial: &str) -> Vec<Completion> {
        let prefix = partial.to_ascii_lowercase();
        ["true", "false"]
            .iter()
            .filter(|candidate| candidate.starts_with(&prefix))
            .map(|candidate| Completion::new(*candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(completions: &[Completion]) -> Vec<&str> {
        completions.iter().map(|c| c.literal()).collect()
    }

    #[test]
    fn test_boolean_prefix_filter() {
        let provider = StandardCompletions::default();
        assert_eq!(literals(&provider.complete_boolean("")), vec!["true", "false"]);
        assert_eq!(literals(&provider.complete_boolean("t")), vec!["true"]);
        assert_eq!(literals(&provider.complete_boolean("F")), vec!["false"]);
        assert!(provider.complete_boolean("9").is_empty());
    }

    #[test]
    fn test_pattern_completion_simple() {
        let provider = StandardCompletions::default();
        assert_eq!(
            literals(&provider.complete_patterns("sto")),
            vec!["stone", "stone_bricks"]
        );
    }

    #[test]
    fn test_pattern_completion_keeps_weight_and_head() {
        let provider = StandardCompletions::default();
        assert_eq!(
            literals(&provider.complete_patterns("60%stone,40%cob")),
            vec!["60%stone,40%cobblestone"]
        );
    }

    #[test]
    fn test_pattern_completion_empty_partial_lists_palette() {
        let provider = StandardCompletions::default();
        assert_eq!(provider.complete_patterns("").len(), BLOCK_PALETTE.len());
    }

    #[test]
    fn test_pattern_completion_no_match() {
        let provider = StandardCompletions::default();
        assert!(provider.complete_patterns("zzz").is_empty());
    }
}
