//! Interactive search session.
//!
//! Runs on a blocking thread; pipeline futures are driven through the
//! runtime handle. Suggestion lookups run per keystroke under a short
//! deadline so a slow provider never stalls typing.

use std::{sync::Arc, time::Duration};

use country_core::{CountrySummary, Lookup, LookupError, render};
use inquire::{
    CustomUserError, InquireError, Select, Text,
    autocompletion::{Autocomplete, Replacement},
};
use tokio::runtime::Handle;
use tracing::debug;

/// Longest a keystroke waits for suggestions before showing none.
const SUGGEST_DEADLINE: Duration = Duration::from_millis(400);

#[derive(Clone)]
struct SuggestionCompleter {
    handle: Handle,
    lookup: Arc<Lookup>,
    deadline: Duration,
}

impl SuggestionCompleter {
    fn new(handle: Handle, lookup: Arc<Lookup>) -> Self {
        Self { handle, lookup, deadline: SUGGEST_DEADLINE }
    }

    fn suggestions(&self, input: &str) -> Vec<String> {
        let lookup = &self.lookup;
        let res = self
            .handle
            .block_on(async { tokio::time::timeout(self.deadline, lookup.suggest(input)).await });

        match res {
            Ok(suggestions) => suggestions.into_vec(),
            Err(_) => {
                debug!(%input, "suggestions timed out");
                Vec::new()
            }
        }
    }
}

impl Autocomplete for SuggestionCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.suggestions(input))
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// Names to offer for the detail view; an empty result reads as no match.
fn detail_choices(input: &str, found: Vec<CountrySummary>) -> Result<Vec<String>, LookupError> {
    if found.is_empty() {
        return Err(LookupError::not_found(input.trim()));
    }
    Ok(found.into_iter().map(|c| c.name_common).collect())
}

/// Prompt, list, pick, show; repeat until the user cancels.
pub fn run(handle: Handle, lookup: Lookup) -> anyhow::Result<()> {
    let lookup = Arc::new(lookup);
    let completer = SuggestionCompleter::new(handle.clone(), Arc::clone(&lookup));

    loop {
        let input = match Text::new("Country:")
            .with_autocomplete(completer.clone())
            .with_help_message("Type at least two letters for suggestions, Esc to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let names = match handle
            .block_on(lookup.search(&input))
            .and_then(|found| {
                println!("{}\n", render::ResultList(&found));
                detail_choices(&input, found)
            }) {
            Ok(names) => names,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        let Some(choice) = Select::new("More details:", names).prompt_skippable()? else {
            continue;
        };

        match handle.block_on(lookup.detail(&choice)) {
            Ok(detail) => println!("{}\n", render::DetailView(&detail)),
            Err(err) => eprintln!("Error loading country details: {err}"),
        }
    }

    Ok(())
}
