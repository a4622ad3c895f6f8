//! Gemini `generateContent` payload types.
//!
//! Response fields are all optional on the wire, so every collection defaults
//! to empty and every scalar is an `Option`.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Content container used in both requests and responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

/// One content fragment. Text and inline media may each be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Returns the inline payload when it actually carries data.
    pub fn image_data(&self) -> Option<&InlineData> {
        self.inline_data
            .as_ref()
            .filter(|inline| inline.data.as_deref().is_some_and(|d| !d.is_empty()))
    }
}

/// Base64 inline payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl Candidate {
    pub fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }
}
