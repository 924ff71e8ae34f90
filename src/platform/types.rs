use serde::{Deserialize, Serialize};

/// A brokered load as returned by the platform API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Load {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub rate_usd: Option<f64>,
    pub pickup_date: Option<String>,
    pub equipment: Option<String>,
}

/// A compliance document in the carrier's vault.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub status: Option<String>,
    pub uploaded_at: Option<String>,
}

/// Payload for submitting a new document.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub file_url: String,
}

/// Payload for posting a message to a channel.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MessagePost {
    pub channel: String,
    pub body: String,
}

/// Server acknowledgement for a posted message.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MessageAck {
    pub id: String,
    pub sent_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LoadList {
    pub loads: Vec<Load>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DocumentList {
    pub documents: Vec<Document>,
}
