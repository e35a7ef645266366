//! The `playbook` subcommand.

use anyhow::Result;
use layup_core::playbook::registry;
use layup_core::{LayupError, Playbook};

use crate::args::PlaybookArgs;
use crate::render;

pub fn execute(args: PlaybookArgs) -> Result<()> {
    let book = registry();

    let shown: Playbook = match &args.action {
        Some(name) => match book.get_key_value(name.as_str()) {
            Some((key, action)) => Playbook::from([(*key, *action)]),
            None => {
                return Err(
                    LayupError::Input(format!("action {name} is not in the playbook")).into(),
                )
            }
        },
        None => book,
    };

    render::playbook_table(&shown);
    Ok(())
}
