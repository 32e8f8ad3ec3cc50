//! Chat command handling, independent of how commands reach us.
//!
//! The Discord adapter turns interactions into `(name, argument, is_private)`
//! calls on `CommandRouter::dispatch` and renders the returned `Reply`.

use crate::core::services::substitution_cipher::SubstitutionCipher;

pub const ENCRYPT_COMMAND: &str = "تشفير";
pub const DECRYPT_COMMAND: &str = "فك_تشفير";
pub const HELP_COMMAND: &str = "help";
/// Name of the single string option both cipher commands take.
pub const TEXT_OPTION: &str = "النص";

const PRIVATE_ONLY: &str = "❌ هذه الأوامر تعمل في الخاص فقط";
const UNKNOWN_COMMAND: &str = "⚠️ هذا الأمر غير معرف";
const EMPTY_TEXT: &str = "❌ اكتب النص";

/// Discord's "Blue" colour.
const HELP_COLOR: u32 = 0x3498DB;

/// A rich message block, rendered as a Discord embed.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// What the bot answers with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    /// Visible only to the user who ran the command.
    pub ephemeral: bool,
}

impl Reply {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
            ephemeral: true,
        }
    }
}

/// Routes slash commands to their handlers.
#[derive(Default)]
pub struct CommandRouter {
    cipher: SubstitutionCipher,
}

impl CommandRouter {
    /// All commands are restricted to direct messages.
    pub fn dispatch(&self, name: &str, arg: &str, is_private: bool) -> Reply {
        if !is_private {
            return Reply::ephemeral(PRIVATE_ONLY);
        }

        match name {
            ENCRYPT_COMMAND => self.transform(arg, |t| self.cipher.encrypt(t)),
            DECRYPT_COMMAND => self.transform(arg, |t| self.cipher.decrypt(t)),
            HELP_COMMAND => help(),
            other => {
                tracing::debug!(command = other, "unknown command");
                Reply::ephemeral(UNKNOWN_COMMAND)
            }
        }
    }

    fn transform(&self, arg: &str, f: impl Fn(&str) -> String) -> Reply {
        let out = f(arg);
        // Discord rejects empty message content
        if out.is_empty() {
            return Reply::ephemeral(EMPTY_TEXT);
        }
        Reply::text(out)
    }
}

fn help() -> Reply {
    Reply {
        content: None,
        embed: Some(Embed {
            title: "📜 قائمة أوامر البوت".into(),
            description: format!(
                "/{ENCRYPT_COMMAND} <{TEXT_OPTION}> → تشفير نص\n/{DECRYPT_COMMAND} <{TEXT_OPTION}> → فك نص مشفر"
            ),
            color: HELP_COLOR,
        }),
        ephemeral: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_in_dm() {
        let router = CommandRouter::default();
        let reply = router.dispatch(ENCRYPT_COMMAND, "سعر جيد", true);
        assert_eq!(reply.content.as_deref(), Some("س3ر جيد"));
        assert!(!reply.ephemeral);
    }

    #[test]
    fn decrypt_in_dm() {
        let router = CommandRouter::default();
        let reply = router.dispatch(DECRYPT_COMMAND, "س3ر جيد", true);
        assert_eq!(reply.content.as_deref(), Some("سعر جيد"));
    }

    #[test]
    fn guild_usage_is_refused() {
        let router = CommandRouter::default();
        for name in [ENCRYPT_COMMAND, DECRYPT_COMMAND, HELP_COMMAND] {
            let reply = router.dispatch(name, "سعر", false);
            assert_eq!(reply.content.as_deref(), Some(PRIVATE_ONLY));
            assert!(reply.ephemeral);
        }
    }

    #[test]
    fn unknown_command() {
        let router = CommandRouter::default();
        let reply = router.dispatch("ping", "", true);
        assert_eq!(reply.content.as_deref(), Some(UNKNOWN_COMMAND));
        assert!(reply.ephemeral);
    }

    #[test]
    fn help_lists_both_commands() {
        let reply = CommandRouter::default().dispatch(HELP_COMMAND, "", true);
        let embed = reply.embed.unwrap();
        assert!(embed.description.contains(ENCRYPT_COMMAND));
        assert!(embed.description.contains(DECRYPT_COMMAND));
    }

    #[test]
    fn blank_text_gets_a_hint() {
        let reply = CommandRouter::default().dispatch(ENCRYPT_COMMAND, "   ", true);
        assert_eq!(reply.content.as_deref(), Some(EMPTY_TEXT));
        assert!(reply.ephemeral);
    }
}
