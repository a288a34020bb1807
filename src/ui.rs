// UI layer: provides a simple interactive menu using `dialoguer`.
// The authorization dance is three manual steps the operator runs in order;
// the menu mirrors that order and prints what each step produced.

use crate::api::PocketClient;
use anyhow::Result;
use dialoguer::{Confirm, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// Main interactive menu. Receives a `PocketClient` instance and runs a
/// simple select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: arrow keys and Enter
/// choose an option.
pub fn main_menu(api: PocketClient) -> Result<()> {
    loop {
        let items = vec![
            "Reset credentials",
            "Begin authorization",
            "Complete authorization",
            "Fetch saved items",
            "Set consumer key",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                // Reset deletes both tokens; confirm before throwing them away.
                let sure = Confirm::new()
                    .with_prompt("Delete the stored request and access tokens?")
                    .interact()?;
                if !sure {
                    continue;
                }
                match api.reset_credentials() {
                    Ok(()) => println!("Tokens cleared. You can begin authorization again."),
                    Err(e) => println!("Reset failed: {}", e),
                }
            }
            1 => {
                let pb = spinner("Requesting token...");
                let result = api.begin_authorization();
                pb.finish_and_clear();
                match result {
                    Ok(url) => {
                        println!("Open this URL in a browser and authorize the app:");
                        println!("{}", url);
                        println!("Then run \"Complete authorization\".");
                    }
                    Err(e) => println!("Begin authorization failed: {}", e),
                }
            }
            2 => {
                let pb = spinner("Exchanging for access token...");
                let result = api.complete_authorization();
                pb.finish_and_clear();
                match result {
                    Ok(()) => println!("Access token stored. You can fetch saved items now."),
                    Err(e) => println!("Complete authorization failed: {}", e),
                }
            }
            3 => {
                let pb = spinner("Fetching saved items...");
                let result = api.fetch_saved();
                pb.finish_and_clear();
                match result {
                    // Dump the response verbatim; no schema to validate.
                    Ok(saved) => println!("{}", serde_json::to_string_pretty(&saved)?),
                    Err(e) => println!("Fetch failed: {}", e),
                }
            }
            4 => {
                // `Password` hides the key from the terminal and shell history.
                let key: String = Password::new().with_prompt("Consumer key").interact()?;
                match api.set_consumer_key(&key) {
                    Ok(()) => println!("Consumer key stored."),
                    Err(e) => println!("Storing consumer key failed: {}", e),
                }
            }
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Spinner shown while a network call is in flight.
fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(msg);
    pb
}
