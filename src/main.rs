// Entrypoint for the CLI application.
// - Keeps `main` small: create a Pocket client and hand it to the UI loop.
// - Returns `anyhow::Result` so failures print with their full context.

use pocketctl::{api::PocketClient, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // A .env file is optional; a missing one just means the credentials
    // come from the property file or the real environment.
    dotenvy::dotenv().ok();
    env_logger::init();

    // Create the client configured by `POCKET_API_URL` / `IS_LOCAL`.
    // See `api::PocketClient::from_env`.
    let api = PocketClient::from_env()?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
