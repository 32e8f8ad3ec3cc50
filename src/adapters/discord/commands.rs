use serde_json::{Value, json};
use tracing::info;

use crate::adapters::discord::{DISCORD_API, build_client, upstream};
use crate::bot::{DECRYPT_COMMAND, ENCRYPT_COMMAND, HELP_COMMAND, TEXT_OPTION};
use crate::core::errors::Result;

const OPTION_STRING: u8 = 3;
const COMMAND_CHAT_INPUT: u8 = 1;

/// Slash command definitions in Discord's application command format.
pub fn definitions() -> Value {
    json!([
        {
            "name": ENCRYPT_COMMAND,
            "type": COMMAND_CHAT_INPUT,
            "description": "تشفير نص حسب كلمات الشوبات",
            "options": [{
                "name": TEXT_OPTION,
                "type": OPTION_STRING,
                "description": "اكتب النص المراد تشفيره",
                "required": true
            }]
        },
        {
            "name": DECRYPT_COMMAND,
            "type": COMMAND_CHAT_INPUT,
            "description": "فك نص مشفر للشوبات",
            "options": [{
                "name": TEXT_OPTION,
                "type": OPTION_STRING,
                "description": "اكتب النص المراد فك تشفيره",
                "required": true
            }]
        },
        {
            "name": HELP_COMMAND,
            "type": COMMAND_CHAT_INPUT,
            "description": "عرض جميع أوامر البوت"
        }
    ])
}

/// Overwrite the application's global commands with `definitions()`.
///
/// Returns the number of commands Discord reports back.
pub async fn register(client_id: &str, bot_token: &str) -> Result<usize> {
    let http = build_client()?;
    let resp = http
        .put(format!("{DISCORD_API}/applications/{client_id}/commands"))
        .header("Authorization", format!("Bot {bot_token}"))
        .json(&definitions())
        .send()
        .await
        .map_err(|e| upstream(format!("command registration failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(upstream(format!(
            "command registration returned status {status}: {body}"
        )));
    }

    let registered: Vec<Value> = resp
        .json()
        .await
        .map_err(|e| upstream(format!("failed to parse registration response: {e}")))?;
    info!(count = registered.len(), "slash commands registered");
    Ok(registered.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_commands_with_text_option() {
        let defs = definitions();
        let defs = defs.as_array().unwrap();
        assert_eq!(defs.len(), 3);

        for def in &defs[..2] {
            let option = &def["options"][0];
            assert_eq!(option["name"], TEXT_OPTION);
            assert_eq!(option["required"], true);
        }
        assert!(defs[2].get("options").is_none());
    }
}
