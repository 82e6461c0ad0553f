use std::collections::HashMap;

/// A configurable prompt pipeline.
///
/// An ordered list of stages, executed exactly once per run, in order.
/// Each stage runs one LLM call with its own instruction and records its
/// output under its declared output-key.
///
/// # Default pipeline
///
/// `Pipeline::default()` creates: understanding -> research -> generation ->
/// explanation (the CodeAssist flow).
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Create a fully custom pipeline.
    pub fn custom(stages: Vec<Stage>) -> Self {
        Self { stages }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            stages: vec![
                Stage::understanding(),
                Stage::research(),
                Stage::generation(),
                Stage::explanation(),
            ],
        }
    }
}

/// A single stage in the pipeline.
///
/// Immutable configuration: defined once at startup, read-only afterwards.
pub struct Stage {
    pub name: String,
    pub instruction: String,
    pub output_key: String,
    pub capabilities: Vec<String>,
    pub prompt_builder: Box<dyn PromptBuilder>,
}

impl Stage {
    /// Create the code understanding stage with its default instruction.
    pub fn understanding() -> Self {
        Self {
            name: "CodeUnderstandingAgent".to_string(),
            instruction: default_understanding_instruction().to_string(),
            output_key: "coding_task_understanding".to_string(),
            capabilities: vec!["web_search".to_string()],
            prompt_builder: Box::new(UnderstandingPromptBuilder),
        }
    }

    /// Create the understanding stage with a custom instruction.
    pub fn understanding_with_instruction(instruction: &str) -> Self {
        let mut stage = Self::understanding();
        stage.instruction = instruction.to_string();
        stage
    }

    /// Create the research stage with its default instruction.
    pub fn research() -> Self {
        Self {
            name: "ResearchAgent".to_string(),
            instruction: default_research_instruction().to_string(),
            output_key: "coding_research".to_string(),
            capabilities: vec!["web_search".to_string()],
            prompt_builder: Box::new(ResearchPromptBuilder),
        }
    }

    /// Create the research stage with a custom instruction.
    pub fn research_with_instruction(instruction: &str) -> Self {
        let mut stage = Self::research();
        stage.instruction = instruction.to_string();
        stage
    }

    /// Create the code generation stage with its default instruction.
    pub fn generation() -> Self {
        Self {
            name: "CodeGenerationAgent".to_string(),
            instruction: default_generation_instruction().to_string(),
            output_key: "code_solution".to_string(),
            capabilities: Vec::new(),
            prompt_builder: Box::new(GenerationPromptBuilder),
        }
    }

    /// Create the generation stage with a custom instruction.
    pub fn generation_with_instruction(instruction: &str) -> Self {
        let mut stage = Self::generation();
        stage.instruction = instruction.to_string();
        stage
    }

    /// Create the explanation stage with its default instruction.
    pub fn explanation() -> Self {
        Self {
            name: "ExplanationAgent".to_string(),
            instruction: default_explanation_instruction().to_string(),
            output_key: "code_explanation".to_string(),
            capabilities: Vec::new(),
            prompt_builder: Box::new(ExplanationPromptBuilder),
        }
    }

    /// Create the explanation stage with a custom instruction.
    pub fn explanation_with_instruction(instruction: &str) -> Self {
        let mut stage = Self::explanation();
        stage.instruction = instruction.to_string();
        stage
    }
}

/// Context passed to prompt builders: the original query plus the outputs
/// recorded so far, addressed by output-key.
///
/// The runner constructs the context from the outputs of already-executed
/// stages only, so a stage can never observe a later stage's output.
pub struct StageContext {
    query: String,
    outputs: HashMap<String, String>,
}

impl StageContext {
    /// Create a context with no recorded outputs.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            outputs: HashMap::new(),
        }
    }

    /// Create a context seeded with outputs accumulated by a reused session.
    pub fn with_outputs(query: impl Into<String>, outputs: HashMap<String, String>) -> Self {
        Self {
            query: query.into(),
            outputs,
        }
    }

    /// The original user query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Look up a prior stage's output by its output-key.
    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).map(|s| s.as_str())
    }

    pub(crate) fn record(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.outputs.insert(key.into(), text.into());
    }
}

/// Builds the user prompt for a stage from the context.
pub trait PromptBuilder: Send + Sync {
    fn build_prompt(&self, context: &StageContext) -> String;
}

// --- Default prompt builders ---

struct UnderstandingPromptBuilder;
impl PromptBuilder for UnderstandingPromptBuilder {
    fn build_prompt(&self, context: &StageContext) -> String {
        context.query().to_string()
    }
}

struct ResearchPromptBuilder;
impl PromptBuilder for ResearchPromptBuilder {
    fn build_prompt(&self, context: &StageContext) -> String {
        let understanding = context.output("coding_task_understanding").unwrap_or("");
        format!(
            "## Coding Request\n{}\n\n\
            ## Coding Task Understanding\n{}",
            context.query(),
            understanding
        )
    }
}

struct GenerationPromptBuilder;
impl PromptBuilder for GenerationPromptBuilder {
    fn build_prompt(&self, context: &StageContext) -> String {
        let understanding = context.output("coding_task_understanding").unwrap_or("");
        let research = context.output("coding_research").unwrap_or("");
        format!(
            "## Coding Request\n{}\n\n\
            ## Coding Task Understanding\n{}\n\n\
            ## Research Findings\n{}",
            context.query(),
            understanding,
            research
        )
    }
}

struct ExplanationPromptBuilder;
impl PromptBuilder for ExplanationPromptBuilder {
    fn build_prompt(&self, context: &StageContext) -> String {
        let understanding = context.output("coding_task_understanding").unwrap_or("");
        let research = context.output("coding_research").unwrap_or("");
        let solution = context.output("code_solution").unwrap_or("");
        format!(
            "## Coding Request\n{}\n\n\
            ## Coding Task Understanding\n{}\n\n\
            ## Research Findings\n{}\n\n\
            ## Code Solution\n{}",
            context.query(),
            understanding,
            research,
            solution
        )
    }
}

// --- Default stage instructions ---

fn default_understanding_instruction() -> &'static str {
    r#"You are a Code Understanding AI.
Based on the user's coding request, formulate a clear understanding of:
1. The programming task or problem they're trying to solve
2. The language, framework, or technologies involved
3. Any specific requirements or constraints

If the user has provided code, analyze it to understand its purpose and structure.
If the user is reporting an error, identify what they're trying to accomplish.

Output a concise summary of the coding task and what the user needs help with.
"#
}

fn default_research_instruction() -> &'static str {
    r#"You are a Coding Research AI.
You are given the user's coding request and the coding task understanding produced by a previous stage.

Formulate 2-3 specific search queries to find:
1. Official documentation relevant to the task
2. Code examples solving similar problems
3. Common issues or errors related to this task and their solutions

Perform web searches using these queries and collect the most relevant information.
Focus on recent, authoritative sources like official documentation, GitHub repositories, Stack Overflow answers, and reputable coding blogs.

Organize this information clearly, including:
- Links to key documentation
- Code snippets that demonstrate solutions
- Explanations of common pitfalls or best practices
"#
}

fn default_generation_instruction() -> &'static str {
    r#"You are a Code Generation and Debugging AI.
You are given the user's coding request, the coding task understanding, and the research findings from previous stages.

Based on this information:

1. IF THE USER NEEDS NEW CODE:
   - Generate well-structured, efficient code that solves their problem
   - Include clear comments explaining key parts of the code
   - Follow best practices for the language/framework
   - Handle potential edge cases and errors

2. IF THE USER HAS CODE WITH ERRORS:
   - Identify the likely causes of the error
   - Provide fixed code with corrections clearly marked
   - Explain what was causing the error and why the fix works

3. IF THE USER WANTS TO IMPROVE EXISTING CODE:
   - Suggest optimizations for performance, readability, or maintainability
   - Provide refactored code examples
   - Explain the benefits of the improvements

Output complete, executable code snippets that directly address the user's needs.
"#
}

fn default_explanation_instruction() -> &'static str {
    r#"You are a Code Explanation AI.
You are given the user's coding request, the coding task understanding, the research findings, and the code solution from previous stages.

Create a comprehensive but concise explanation that includes:

1. SOLUTION OVERVIEW:
   - Summarize the approach taken to solve the problem
   - Explain why this approach is appropriate

2. CODE WALKTHROUGH:
   - Break down how the key parts of the code work
   - Highlight important functions, methods, or patterns used

3. LEARNING RESOURCES:
   - Suggest specific documentation or tutorials for further learning
   - Point out related concepts the user might want to explore

4. NEXT STEPS:
   - Suggest how the user might extend or improve the solution
   - Mention potential edge cases or considerations for production use

Make your explanation educational and helpful, assuming the user wants to understand not just what the solution is, but why it works and how they can learn from it.

Format your response using Markdown for better readability, with code blocks for all code examples.
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_includes_prior_outputs() {
        let mut context = StageContext::new("write a parser");
        context.record("coding_task_understanding", "parse CSV in Rust");
        context.record("coding_research", "use the csv crate");

        let prompt = GenerationPromptBuilder.build_prompt(&context);
        assert!(prompt.contains("write a parser"));
        assert!(prompt.contains("parse CSV in Rust"));
        assert!(prompt.contains("use the csv crate"));
    }

    #[test]
    fn research_prompt_tolerates_missing_understanding() {
        let context = StageContext::new("write a parser");
        let prompt = ResearchPromptBuilder.build_prompt(&context);
        assert!(prompt.contains("write a parser"));
        assert!(prompt.contains("## Coding Task Understanding"));
    }

    #[test]
    fn default_pipeline_has_four_stages_in_order() {
        let pipeline = Pipeline::default();
        let names: Vec<&str> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "CodeUnderstandingAgent",
                "ResearchAgent",
                "CodeGenerationAgent",
                "ExplanationAgent"
            ]
        );
    }
}
