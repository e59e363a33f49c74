use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /send`
///
/// Field names are capitalized on the wire; the lowercase spellings are
/// accepted as well.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendRequest {
    /// Sender identity shown to the recipient
    #[serde(rename = "From", alias = "from", default)]
    pub from: String,

    /// Recipient address, used as the store key
    #[serde(rename = "To", alias = "to")]
    #[validate(length(min = 1, message = "Recipient must not be empty"))]
    pub to: String,

    /// Text placed before the code
    #[serde(rename = "Text", alias = "text", default)]
    pub text: String,
}

/// Body of a successful `GET /validation/{phone}/{token}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub result: bool,
}
