//! Prompt templates for Lectern.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub query: QueryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for question answering over lecture excerpts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPrompts {
    /// The full instruction template. Slots: {{lecture_data}}, {{question}}.
    pub template: String,
    /// Substituted into the lecture data slot when retrieval finds nothing.
    pub no_data_notice: String,
}

impl Default for QueryPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a teaching assistant for the course "{{course_name}}".

You are given subtitle excerpts from lecture videos with lecture title,
lecture number, start time, end time, and spoken text.

Answer the student's question ONLY using this information.
Explain clearly in simple language.

Always mention:
- which lecture(s)
- exact timestamp(s)
where the topic is explained, and guide the student to rewatch that part.

If the question is not covered in the course, say so clearly.
Do not mention internal data formats or technical processing details.

Lecture data:
{{lecture_data}}

---------------------------------
Student question:
"{{question}}"
"#
            .to_string(),

            no_data_notice: "No matching lecture excerpts were found for this question. \
                             Tell the student the course material does not appear to cover it."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        // "course_name" is an ordinary variable; give it a fallback so the
        // default template renders without configuration.
        prompts
            .variables
            .entry("course_name".to_string())
            .or_insert_with(|| "Internet of Things".to_string());

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let query_path = custom_path.join("query.toml");
            if query_path.exists() {
                let content = std::fs::read_to_string(&query_path)?;
                prompts.query = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
