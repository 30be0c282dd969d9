//! Dialoguer theme and stderr styles shared by the commands.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` with Tagsmith's prompt styling.
pub fn tagsmith_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Dimmed stderr style for secondary information.
pub fn dim() -> Style {
    Style::new().for_stderr().dim()
}

/// Yellow stderr style for warnings.
pub fn warn() -> Style {
    Style::new().for_stderr().yellow()
}

/// Green stderr style for success lines.
pub fn ok() -> Style {
    Style::new().for_stderr().green()
}
