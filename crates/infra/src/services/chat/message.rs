use nettu_notifier_domain::{NotificationKind, NotificationMessage};
use serde::{Deserialize, Serialize};

/// Payload accepted by Discord and Slack style incoming webhooks. Discord
/// reads `content` and `embeds`, Slack reads `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<ChatEmbed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEmbed {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<ChatEmbedField>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl ChatEmbedField {
    fn new(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline: true,
        }
    }
}

fn embed_style(kind: NotificationKind) -> (&'static str, u32) {
    match kind {
        NotificationKind::EventCreated => ("Event created", 0x2ecc71),
        NotificationKind::EventUpdated => ("Event updated", 0x3498db),
        NotificationKind::EventDeleted => ("Event deleted", 0xe74c3c),
        NotificationKind::EventReminder => ("Reminder", 0xf1c40f),
        NotificationKind::Custom => ("Notification", 0x95a5a6),
    }
}

impl From<&NotificationMessage> for ChatMessage {
    fn from(n: &NotificationMessage) -> Self {
        let (title, color) = embed_style(n.kind());
        let mut fields = vec![ChatEmbedField::new("Owner", n.owner_id().to_string())];
        let mut description = None;
        if let Some(event) = n.event() {
            description = event.description.clone();
            fields.push(ChatEmbedField::new("Title", event.title.clone()));
            fields.push(ChatEmbedField::new("Starts", event.start_time.to_rfc3339()));
            fields.push(ChatEmbedField::new("Ends", event.end_time.to_rfc3339()));
        }
        if let Some(metadata) = n.metadata() {
            let mut entries: Vec<_> = metadata.iter().collect();
            entries.sort();
            for (key, value) in entries {
                fields.push(ChatEmbedField::new(key, value.clone()));
            }
        }

        Self {
            content: n.text().to_string(),
            text: n.text().to_string(),
            embeds: vec![ChatEmbed {
                title: title.to_string(),
                description,
                color,
                fields,
                timestamp: n.emitted_at().to_rfc3339(),
            }],
        }
    }
}
