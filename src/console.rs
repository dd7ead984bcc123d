//! Operator interaction.
//!
//! The pipeline talks to the operator only through [`Console`]: one
//! free-text prompt, one single-choice list, and status lines.
//! [`TerminalConsole`] renders them with `dialoguer` and `colored`.

use colored::Colorize;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::error::PipelineError;

/// Prompt shown for the user identifier.
pub const USER_ID_PROMPT: &str = "Please enter the user ID";
/// Prompt shown above the video list.
pub const SELECT_PROMPT: &str = "Which video would you like to process?";

/// Console prompts and status output.
pub trait Console {
    /// Ask for the user identifier.
    fn prompt_user_id(&self) -> Result<String, PipelineError>;

    /// Let the operator pick one of `choices`; returns the chosen entry.
    fn select_video(&self, choices: &[String]) -> Result<String, PipelineError>;

    /// Neutral status line.
    fn info(&self, message: &str);

    /// A step completed.
    fn success(&self, message: &str);

    /// A step failed.
    fn error(&self, message: &str);
}

/// Interactive terminal console.
#[derive(Debug, Clone, Default)]
pub struct TerminalConsole {
    preset_user_id: Option<String>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer [`Console::prompt_user_id`] with `user_id` instead of asking.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.preset_user_id = Some(user_id.into());
        self
    }
}

impl Console for TerminalConsole {
    fn prompt_user_id(&self) -> Result<String, PipelineError> {
        if let Some(user_id) = &self.preset_user_id {
            return Ok(user_id.clone());
        }
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(USER_ID_PROMPT)
            .interact_text()
            .map_err(|error| PipelineError::Prompt(error.to_string()))
    }

    fn select_video(&self, choices: &[String]) -> Result<String, PipelineError> {
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(SELECT_PROMPT)
            .items(choices)
            .default(0)
            .interact()
            .map_err(|error| PipelineError::Prompt(error.to_string()))?;

        choices
            .get(index)
            .cloned()
            .ok_or_else(|| PipelineError::Prompt(format!("selection {index} out of range")))
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn success(&self, message: &str) {
        println!("{} {}", "success:".green().bold(), message.green());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }
}
