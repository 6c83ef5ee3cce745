use crate::{
    config::Config,
    domain::DialogInfo,
    error::Result,
    tg_api::{self, Session},
};
use anyhow::Context;
use std::path::Path;

const NO_CHANNELS_MESSAGE: &str = "No channels or supergroups found for this account.";

/// Prints a table of the channels and supergroups the account is a member of.
pub async fn run(config: &Config, session_path: &Path) -> Result<()> {
    let mut client = tg_api::Client::authenticate(config, session_path).await?;

    let listed = client.list_dialogs().await;

    if let Err(err) = client.disconnect().await {
        log::warn!("Failed to release session: {err:#}");
    }

    match listed.context("retrieving channel info") {
        Ok(dialogs) => println!("{}", format_table(&dialogs)),
        Err(err) => log::error!("Failed to retrieve channel info: {err:#}"),
    }

    Ok(())
}

fn format_table(dialogs: &[DialogInfo]) -> String {
    let rows: Vec<[String; 3]> = dialogs
        .iter()
        .filter_map(|dialog| {
            let kind = if dialog.is_broadcast {
                "Channel"
            } else if dialog.is_supergroup {
                "Supergroup"
            } else {
                return None;
            };

            let title = if dialog.name.is_empty() {
                "(No title)".to_owned()
            } else {
                dialog.name.clone()
            };

            Some([title, dialog.id.to_string(), kind.to_owned()])
        })
        .collect();

    if rows.is_empty() {
        return NO_CHANNELS_MESSAGE.to_owned();
    }

    let header = ["Channel Title", "Chat ID", "Type"].map(str::to_owned);

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let format_row = |row: &[String; 3]| {
        let cells = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!(" {cell:<width$} "))
            .collect::<Vec<_>>()
            .join("|");

        format!("|{cells}|")
    };

    let mut lines = vec![separator.clone(), format_row(&header), separator.clone()];
    lines.extend(rows.iter().map(format_row));
    lines.push(separator);

    lines.join("\n")
}
