//! One-time terms of use acknowledgment.

use dialoguer::Confirm;
use tagsmith_core::Config;

use super::{settings, theme};

/// Disclaimer shown before the first analysis.
pub const TERMS: &str = "\
Disclaimer

The developers of this software accept no responsibility for any problem or
damage arising from its use.

Tagsmith uses an AI model to describe the elements that make up an image. Its
tags are a reference, not a verdict. Do not use it to analyze other people's
artwork in order to harass or defame them.

By agreeing you confirm that you have read, understood and accepted these
terms.";

/// Make sure the user has accepted the terms, asking once if needed.
///
/// Returns `false` when the user declines. Acceptance is saved to the config
/// file so the question is not asked again.
pub fn ensure_accepted(config: &Config, pre_accepted: bool) -> anyhow::Result<bool> {
    if config.general.agreed_terms {
        return Ok(true);
    }

    let agreed = pre_accepted || ask()?;
    if agreed {
        let path = Config::default_path();
        match settings::set_value(&path, "general.agreed_terms", "true") {
            Ok(()) => tracing::debug!("Terms acceptance saved to {}", path.display()),
            Err(e) => tracing::warn!("Could not save terms acceptance: {e}"),
        }
    }
    Ok(agreed)
}

fn ask() -> anyhow::Result<bool> {
    eprintln!();
    eprintln!("{}", theme::warn().apply_to(TERMS));
    eprintln!();

    Confirm::with_theme(&theme::tagsmith_theme())
        .with_prompt("Do you agree to these terms?")
        .default(false)
        .interact()
        .map_err(|e| {
            anyhow::anyhow!("Could not ask for terms acceptance ({e}); rerun with --accept-terms")
        })
}
