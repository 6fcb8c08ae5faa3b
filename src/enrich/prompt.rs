// Prompt construction — one stable directive per codification task.
//
// The directive wording is part of the external contract with the model:
// it must stay byte-identical across calls so model behavior (and the JSON
// reply shape the parser expects) stays reproducible. The directives are in
// Spanish, matching the datasets this tool is pointed at.

use std::time::Duration;

use super::pacing::IntervalPacing;

/// Default target language for the translation task.
pub const DEFAULT_TARGET_LANGUAGE: &str = "inglés";

/// Default maximum topic count for the topics task.
pub const DEFAULT_MAX_TOPICS: usize = 3;

/// Pacing interval shared by every task: pause once per this many batches.
const PACE_EVERY_BATCHES: usize = 100;

/// The codification requested of the model for each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Extract up to `max_topics` topics per record (list of short strings).
    Topics,
    /// Classify each record as positive / negative / neutral sentiment.
    Sentiment,
    /// Translate each record into `target_language`.
    Translation,
    /// Correct each record's spelling.
    Spelling,
}

impl Task {
    /// Short name used for output file naming and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Topics => "topics",
            Task::Sentiment => "sentiment",
            Task::Translation => "translation",
            Task::Spelling => "spelling",
        }
    }

    /// Default pacing for this task.
    ///
    /// Topic extraction paces less aggressively (shorter pause) than the
    /// other tasks, which have proven more rate-limit sensitive.
    pub fn default_pacing(&self) -> IntervalPacing {
        let delay = match self {
            Task::Topics => Duration::from_secs(10),
            _ => Duration::from_secs(15),
        };
        IntervalPacing::new(PACE_EVERY_BATCHES, delay)
    }
}

/// Task knobs supplied by the caller. Only some tasks read each field.
#[derive(Debug, Clone)]
pub struct TaskParams {
    /// Maximum number of topics per record (topics task only).
    pub max_topics: usize,
    /// Target language for translation (translation task only).
    pub target_language: String,
}

impl Default for TaskParams {
    fn default() -> Self {
        Self {
            max_topics: DEFAULT_MAX_TOPICS,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

/// Combine a task directive with a formatted batch block into one prompt.
///
/// Every prompt ends with the instruction that the reply must be a single
/// JSON object keyed by the tagged record identifiers.
pub fn build_prompt(task: Task, block: &str, params: &TaskParams) -> String {
    match task {
        Task::Topics => format!(
            "Determine máximo {max} tópicos para cada una de las frases a continuación:\n\
             \n\
             {block}\n\
             \n\
             Cada tópico debe ser de máximo tres palabras.\n\
             El resultado debe ser un único JSON con cada frase y su lista de tópicos.",
            max = params.max_topics,
        ),
        Task::Sentiment => format!(
            "Clasifica cada una de las frases a continuación en sentimiento \
             positivo, negativo o neutro.\n\
             \n\
             {block}\n\
             \n\
             El resultado debe ser un único JSON con cada frase y su sentimiento.",
        ),
        Task::Translation => format!(
            "Realice la traducción a {lang} de cada una de las frases a continuación:\n\
             \n\
             {block}\n\
             \n\
             El resultado debe ser un único JSON con cada frase y su traducción.",
            lang = params.target_language,
        ),
        Task::Spelling => format!(
            "Realice la corrección ortográfica de cada una de las frases a continuación:\n\
             \n\
             {block}\n\
             \n\
             El resultado debe ser un único JSON con cada frase y su corrección ortográfica.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_block_verbatim() {
        let block = "Frase0: hola\nFrase1: adiós";
        for task in [Task::Topics, Task::Sentiment, Task::Translation, Task::Spelling] {
            let prompt = build_prompt(task, block, &TaskParams::default());
            assert!(prompt.contains(block), "{} prompt must embed the block", task.name());
        }
    }

    #[test]
    fn every_prompt_demands_a_single_json_object() {
        for task in [Task::Topics, Task::Sentiment, Task::Translation, Task::Spelling] {
            let prompt = build_prompt(task, "Frase0: x", &TaskParams::default());
            assert!(prompt.contains("un único JSON"));
        }
    }

    #[test]
    fn topics_prompt_states_max_topic_count() {
        let params = TaskParams {
            max_topics: 5,
            ..TaskParams::default()
        };
        let prompt = build_prompt(Task::Topics, "Frase0: x", &params);
        assert!(prompt.contains("máximo 5 tópicos"));
    }

    #[test]
    fn translation_prompt_states_target_language() {
        let params = TaskParams {
            target_language: "francés".to_string(),
            ..TaskParams::default()
        };
        let prompt = build_prompt(Task::Translation, "Frase0: x", &params);
        assert!(prompt.contains("traducción a francés"));
    }

    #[test]
    fn translation_defaults_to_ingles() {
        let prompt = build_prompt(Task::Translation, "Frase0: x", &TaskParams::default());
        assert!(prompt.contains("traducción a inglés"));
    }

    #[test]
    fn directives_are_stable_across_calls() {
        let params = TaskParams::default();
        let a = build_prompt(Task::Sentiment, "Frase0: x", &params);
        let b = build_prompt(Task::Sentiment, "Frase0: x", &params);
        assert_eq!(a, b);
    }

    #[test]
    fn topics_paces_shorter_than_the_rest() {
        let topics = Task::Topics.default_pacing();
        let sentiment = Task::Sentiment.default_pacing();
        assert!(topics.delay() < sentiment.delay());
    }
}
