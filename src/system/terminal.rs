// src/system/terminal.rs

use crate::core::prompt::{PromptError, PromptRequest, Prompter};
use colored::*;
use dialoguer::{Input, theme::ColorfulTheme};

/// Asks for parameter values on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

/// Builds the prompt line, e.g. `IN - Input image`.
fn prompt_line(request: &PromptRequest<'_>) -> String {
    if request.prompt_text.is_empty() {
        request.keyword.to_string()
    } else {
        format!("{} - {}", request.keyword, request.prompt_text)
    }
}

impl Prompter for TerminalPrompter {
    fn request(&mut self, request: &PromptRequest<'_>) -> Result<String, PromptError> {
        if let Some(message) = &request.diagnostic {
            eprintln!("{}", message.red());
        }

        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt_line(request))
            .allow_empty(true);
        if let Some(suggested) = &request.suggested {
            input = input.default(suggested.clone());
        }
        Ok(input.interact_text()?)
    }
}
