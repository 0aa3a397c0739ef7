use std::io::{BufRead, Write};

use anyhow::Result;
use subtrack_core::{format, StoreError, SubscriptionStore};

const HELP: &str = "Commands: add <name> <YYYY-MM-DD>, rm <index>, list, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ManagerCommand {
    Add { end_date: String, name: String },
    Remove(usize),
    List,
    Help,
    Quit,
}

impl ManagerCommand {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match verb.to_ascii_lowercase().as_str() {
            "add" => {
                // Names may contain spaces; the date is the last word.
                let (name, end_date) = rest.rsplit_once(char::is_whitespace).unwrap_or((rest, ""));
                Some(Self::Add {
                    end_date: end_date.to_string(),
                    name: name.trim().to_string(),
                })
            }
            "rm" | "remove" | "delete" => rest.parse().ok().map(Self::Remove),
            "list" | "ls" => Some(Self::List),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Interactive editor over the store. The view is re-rendered after every
/// successful change; incomplete adds are dropped without comment.
pub fn run_manager<R: BufRead, W: Write>(
    store: &SubscriptionStore,
    input: R,
    mut output: W,
) -> Result<()> {
    render(store, &mut output)?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt(&mut output)?;
            continue;
        }
        match ManagerCommand::parse(&line) {
            Some(ManagerCommand::Quit) => break,
            Some(ManagerCommand::Add { end_date, name }) => {
                store.add(&name, &end_date)?;
                render(store, &mut output)?;
            }
            Some(ManagerCommand::Remove(index)) => match store.remove_at(index) {
                Ok(_) => render(store, &mut output)?,
                Err(err @ StoreError::IndexOutOfRange { .. }) => writeln!(output, "{err}")?,
                Err(err) => return Err(err.into()),
            },
            Some(ManagerCommand::List) => render(store, &mut output)?,
            Some(ManagerCommand::Help) => writeln!(output, "{HELP}")?,
            None => writeln!(output, "Unrecognised command. Type `help`.")?,
        }
        prompt(&mut output)?;
    }
    Ok(())
}

fn render<W: Write>(store: &SubscriptionStore, output: &mut W) -> Result<()> {
    writeln!(output, "Subscription manager")?;
    let subscriptions = store.snapshot();
    if subscriptions.is_empty() {
        writeln!(output, "  (no subscriptions)")?;
    }
    for (index, subscription) in subscriptions.iter().enumerate() {
        writeln!(output, "  {}", format::manager_row(index, subscription))?;
    }
    writeln!(output, "{HELP}")?;
    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "> ")?;
    output.flush()?;
    Ok(())
}
