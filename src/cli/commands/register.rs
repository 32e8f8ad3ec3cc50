use crate::adapters::discord::commands;
use crate::cli::output;
use crate::core::errors::Result;

/// Execute `shopkeeper register-commands`.
///
/// Overwrites the application's global slash commands with the cipher
/// and help commands.
pub fn execute(client_id: &str, token: &str) -> Result<()> {
    output::header("🤖 Shopkeeper: register commands");

    let runtime = tokio::runtime::Runtime::new()?;
    let sp = output::spinner("Registering slash commands with Discord...");
    match runtime.block_on(commands::register(client_id, token)) {
        Ok(count) => {
            output::finish_spinner(sp, &format!("{count} commands registered"));
            Ok(())
        }
        Err(e) => {
            sp.finish_and_clear();
            Err(e)
        }
    }
}
