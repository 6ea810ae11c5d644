use async_trait::async_trait;
use reqwest::Client;
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use serde_json::json;
use tracing::trace;

use super::{
    NewNote,
    NoteFields,
    NoteStore,
};
use crate::core::SyncError;

pub const DEFAULT_ANKI_CONNECT_URL: &str = "http://127.0.0.1:8765";
const API_VERSION: u32 = 6;

#[derive(Debug, Serialize)]
struct Request<'a> {
    action: &'a str,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A non-null `error` wins over whatever `result` holds.
    pub fn into_result(self) -> Result<Option<T>, SyncError> {
        match self.error {
            Some(error) => Err(SyncError::Remote(error)),
            None => Ok(self.result),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteInfo {
    #[serde(default)]
    cards: Vec<u64>,
}

/// [`NoteStore`] backed by the AnkiConnect add-on.
#[derive(Debug, Clone)]
pub struct AnkiConnect {
    client: Client,
    url: String,
}

impl AnkiConnect {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: Client::new(), url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<serde_json::Value>,
    ) -> Result<Option<T>, SyncError> {
        trace!(action, "AnkiConnect request");
        let body = Request { action, version: API_VERSION, params };

        let response = self.client.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status(response.status().as_u16()));
        }

        let response: ApiResponse<T> = response.json().await?;
        response.into_result()
    }

    /// Like [`Self::invoke`] for actions whose result is meaningless (`null` on success).
    async fn invoke_unit(&self, action: &str, params: serde_json::Value) -> Result<(), SyncError> {
        self.invoke::<serde_json::Value>(action, Some(params)).await?;
        Ok(())
    }

    pub async fn version(&self) -> Result<u32, SyncError> {
        self.invoke::<u32>("version", None).await?.ok_or(SyncError::EmptyResult("version"))
    }

    pub async fn find_notes(&self, query: &str) -> Result<Vec<u64>, SyncError> {
        let params = json!({ "query": query });
        Ok(self.invoke::<Vec<u64>>("findNotes", Some(params)).await?.unwrap_or_default())
    }
}

#[async_trait]
impl NoteStore for AnkiConnect {
    async fn create_deck(&self, deck: &str) -> Result<(), SyncError> {
        self.invoke_unit("createDeck", json!({ "deck": deck })).await
    }

    async fn add_note(&self, note: &NewNote) -> Result<u64, SyncError> {
        let params = json!({
            "note": {
                "deckName": note.deck_name,
                "modelName": note.model_name,
                "fields": note.fields,
                "tags": note.tags,
                "options": {
                    "allowDuplicate": false,
                    "duplicateScope": "deck",
                    "duplicateScopeOptions": { "deckName": note.deck_name },
                },
            }
        });

        self.invoke::<u64>("addNote", Some(params)).await?.ok_or(SyncError::EmptyResult("addNote"))
    }

    async fn update_note_fields(&self, note_id: u64, fields: &NoteFields) -> Result<(), SyncError> {
        self.invoke_unit("updateNoteFields", json!({ "note": { "id": note_id, "fields": fields } }))
            .await
    }

    async fn add_tags(&self, note_ids: &[u64], tags: &[String]) -> Result<(), SyncError> {
        if tags.is_empty() || note_ids.is_empty() {
            return Ok(());
        }
        self.invoke_unit("addTags", json!({ "notes": note_ids, "tags": tags.join(" ") })).await
    }

    async fn find_notes_by_tag(&self, tag: &str) -> Result<Vec<u64>, SyncError> {
        self.find_notes(&format!("tag:{tag}")).await
    }

    async fn note_card_ids(&self, note_id: u64) -> Result<Vec<u64>, SyncError> {
        let notes = self
            .invoke::<Vec<NoteInfo>>("notesInfo", Some(json!({ "notes": [note_id] })))
            .await?
            .unwrap_or_default();

        Ok(notes.into_iter().next().map(|note| note.cards).unwrap_or_default())
    }

    async fn change_deck(&self, card_ids: &[u64], deck: &str) -> Result<(), SyncError> {
        if card_ids.is_empty() {
            return Ok(());
        }
        self.invoke_unit("changeDeck", json!({ "cards": card_ids, "deck": deck })).await
    }
}
