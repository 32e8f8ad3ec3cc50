use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::bot::{CommandRouter, Reply, TEXT_OPTION};
use crate::core::errors::{Result, ShopkeeperError};

const INTERACTION_PING: u8 = 1;
const INTERACTION_APPLICATION_COMMAND: u8 = 2;

const RESPONSE_PONG: u8 = 1;
const RESPONSE_CHANNEL_MESSAGE: u8 = 4;

const FLAG_EPHEMERAL: u64 = 1 << 6;

/// Verifies the `X-Signature-Ed25519` header Discord puts on every
/// interaction request.
#[derive(Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    /// `public_key_hex` is the application's public key from the developer
    /// portal.
    pub fn from_hex(public_key_hex: &str) -> Result<Self> {
        let bytes: [u8; 32] = hex::decode(public_key_hex.trim())
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ShopkeeperError::InvalidConfig {
                detail: "DISCORD_PUBLIC_KEY must be 64 hex characters".into(),
            })?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|e| ShopkeeperError::InvalidConfig {
            detail: format!("DISCORD_PUBLIC_KEY is not a valid Ed25519 key: {e}"),
        })?;
        Ok(Self { key })
    }

    /// Check `signature_hex` over `timestamp || body`.
    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> Result<()> {
        let sig: [u8; 64] = hex::decode(signature_hex)
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or(ShopkeeperError::InvalidSignature)?;
        let signature = Signature::from_bytes(&sig);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| ShopkeeperError::InvalidSignature)
    }
}

#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    pub guild_id: Option<String>,
    pub data: Option<CommandData>,
}

#[derive(Debug, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<EmbedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EmbedData {
    pub title: String,
    pub description: String,
    pub color: u32,
}

impl From<Reply> for InteractionResponse {
    fn from(reply: Reply) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(MessageData {
                content: reply.content,
                embeds: reply
                    .embed
                    .into_iter()
                    .map(|e| EmbedData {
                        title: e.title,
                        description: e.description,
                        color: e.color,
                    })
                    .collect(),
                flags: reply.ephemeral.then_some(FLAG_EPHEMERAL),
            }),
        }
    }
}

/// Answer an already-verified interaction. `None` means the interaction
/// type is not one we handle.
pub fn respond(router: &CommandRouter, interaction: &Interaction) -> Option<InteractionResponse> {
    match interaction.kind {
        INTERACTION_PING => Some(InteractionResponse {
            kind: RESPONSE_PONG,
            data: None,
        }),
        INTERACTION_APPLICATION_COMMAND => {
            let data = interaction.data.as_ref()?;
            let text = data
                .options
                .iter()
                .find(|o| o.name == TEXT_OPTION)
                .and_then(|o| o.value.as_ref())
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            // Interactions from DMs carry no guild
            let is_private = interaction.guild_id.is_none();
            Some(router.dispatch(&data.name, text, is_private).into())
        }
        other => {
            tracing::debug!(kind = other, "ignoring interaction type");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{ENCRYPT_COMMAND, HELP_COMMAND};
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair() -> (SigningKey, InteractionVerifier) {
        let signing = SigningKey::generate(&mut rand::rngs::OsRng);
        let verifier =
            InteractionVerifier::from_hex(&hex::encode(signing.verifying_key().to_bytes())).unwrap();
        (signing, verifier)
    }

    fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        let mut msg = timestamp.as_bytes().to_vec();
        msg.extend_from_slice(body);
        hex::encode(key.sign(&msg).to_bytes())
    }

    #[test]
    fn valid_signature_passes() {
        let (key, verifier) = keypair();
        let body = br#"{"type":1}"#;
        let sig = sign(&key, "1700000000", body);
        assert!(verifier.verify(&sig, "1700000000", body).is_ok());
    }

    #[test]
    fn tampered_body_or_timestamp_fails() {
        let (key, verifier) = keypair();
        let sig = sign(&key, "1700000000", br#"{"type":1}"#);
        assert!(verifier.verify(&sig, "1700000000", br#"{"type":2}"#).is_err());
        assert!(verifier.verify(&sig, "1700000001", br#"{"type":1}"#).is_err());
        assert!(verifier.verify("zz", "1700000000", br#"{"type":1}"#).is_err());
    }

    #[test]
    fn bad_public_key_is_config_error() {
        assert!(matches!(
            InteractionVerifier::from_hex("abcd"),
            Err(ShopkeeperError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn ping_gets_pong() {
        let interaction: Interaction = serde_json::from_str(r#"{"type":1}"#).unwrap();
        let resp = respond(&CommandRouter::default(), &interaction).unwrap();
        assert_eq!(serde_json::to_value(&resp).unwrap(), serde_json::json!({"type": 1}));
    }

    #[test]
    fn dm_command_is_answered_publicly() {
        let json = serde_json::json!({
            "type": 2,
            "data": {
                "name": ENCRYPT_COMMAND,
                "options": [{"name": TEXT_OPTION, "type": 3, "value": "سعر جيد"}]
            }
        });
        let interaction: Interaction = serde_json::from_value(json).unwrap();
        let resp = respond(&CommandRouter::default(), &interaction).unwrap();

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["type"], 4);
        assert_eq!(value["data"]["content"], "س3ر جيد");
        assert!(value["data"].get("flags").is_none());
    }

    #[test]
    fn guild_command_is_refused_ephemerally() {
        let json = serde_json::json!({
            "type": 2,
            "guild_id": "999",
            "data": {"name": ENCRYPT_COMMAND, "options": []}
        });
        let interaction: Interaction = serde_json::from_value(json).unwrap();
        let resp = respond(&CommandRouter::default(), &interaction).unwrap();

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["data"]["flags"], 64);
    }

    #[test]
    fn help_renders_embed() {
        let json = serde_json::json!({"type": 2, "data": {"name": HELP_COMMAND}});
        let interaction: Interaction = serde_json::from_value(json).unwrap();
        let resp = respond(&CommandRouter::default(), &interaction).unwrap();

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["data"]["embeds"][0]["title"], "📜 قائمة أوامر البوت");
        assert!(value["data"].get("content").is_none());
    }
}
