//! Prompt construction for incident extraction

use threatlens_domain::{Field, Prompt, Tokenizer};

/// Persona framing sent as the system message
pub const SYSTEM_INSTRUCTION: &str = "You are a cybersecurity expert with 25 years of hands-on experience. \
Extract and analyze log data to identify security incidents, threats, and actionable items.";

const TASK_INTRO: &str = "Analyze the following log data and extract security-related information.\n\
Include the following fields in the tabular output:";

const OUTPUT_FORMAT: &str = "Output format: one header line with the field names, then one line per incident.\n\
Separate fields with a single tab character and keep the field order above.\n\
Do not use markdown, pipes or commas as separators.";

/// Builds the two-part prompt for one chunk
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
    task: String,
}

impl PromptBuilder {
    /// Create a prompt builder with the standard persona and task template
    pub fn new() -> Self {
        let mut task = String::new();
        task.push_str(TASK_INTRO);
        task.push('\n');
        for field in Field::ALL {
            task.push_str("- ");
            task.push_str(field.as_str());
            task.push('\n');
        }
        task.push('\n');
        task.push_str(OUTPUT_FORMAT);
        task.push_str("\n\nHere is the log data:\n");

        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            task,
        }
    }

    /// Replace the system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Build the prompt for the given chunk text
    pub fn build(&self, chunk_text: &str) -> Prompt {
        let mut user = String::with_capacity(self.task.len() + chunk_text.len());
        user.push_str(&self.task);
        user.push_str(chunk_text);
        Prompt::new(self.system.clone(), user)
    }

    /// Tokens used by the fixed parts of every prompt
    pub fn overhead_tokens<T: Tokenizer + ?Sized>(&self, tokenizer: &T) -> usize {
        tokenizer.count_tokens(&self.system) + tokenizer.count_tokens(&self.task)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
