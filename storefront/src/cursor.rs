//! Opaque pagination cursors
//!
//! A cursor records where the previous page stopped: the identifier of the
//! boundary record plus the values of its sort fields. On the wire it is the
//! URL-safe base64 encoding of a JSON object such as
//! `{"id":"b","created_at":"2024-01-02T00:00:00"}`. The server keeps no other
//! state, so the token is the cursor.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::sort::SortSpec;
use crate::traits::Record;

/// Key under which every cursor stores the boundary record's identifier.
pub const ID_KEY: &str = "id";

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Standard alphabet, padding optional; accepts tokens minted by older clients.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// A decoded cursor: field name to JSON value, always carrying [`ID_KEY`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cursor {
    fields: Map<String, Json>,
}

impl Cursor {
    /// Create a cursor holding only an identifier.
    pub fn new(id: impl Into<Json>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_KEY.to_string(), id.into());
        Self { fields }
    }

    /// Add a field value, replacing any previous value for that field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Json>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Json>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Json> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The boundary record's identifier.
    pub fn id(&self) -> &Json {
        self.fields.get(ID_KEY).unwrap_or(&Json::Null)
    }

    pub fn fields(&self) -> &Map<String, Json> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Json> {
        self.fields
    }

    /// Build the cursor that resumes after `record` under `sort`.
    ///
    /// Embeds the identifier and the value of every other sort field. With
    /// the usual `[primary, id]` spec that is exactly `{id, primary}`.
    pub fn from_record<R: Record>(record: &R, sort: &SortSpec) -> Result<Self> {
        let mut cursor = Cursor::new(record.id().to_json());
        for f in sort.fields() {
            if f.field == R::id_field() {
                continue;
            }
            if let Some(value) = record.get(&f.field) {
                cursor.insert(f.field.clone(), value.to_json());
            }
        }
        check_id(&cursor.fields)?;
        Ok(cursor)
    }

    /// Serialize into an opaque, URL-safe token.
    pub fn encode(&self) -> Result<String> {
        check_id(&self.fields)?;
        let json = serde_json::to_vec(&self.fields)
            .map_err(|e| Error::InvalidCursor(format!("cannot serialize cursor: {}", e)))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Parse a token produced by [`Cursor::encode`].
    ///
    /// Anything from the first `&` or `?` on is ignored, which tolerates
    /// tokens pasted together with the rest of a query string.
    pub fn decode(token: &str) -> Result<Self> {
        let token = token
            .split(['&', '?'])
            .next()
            .unwrap_or_default()
            .trim();
        if token.is_empty() {
            return Err(Error::InvalidCursor("cursor is empty".into()));
        }

        let bytes = URL_SAFE_LENIENT
            .decode(token)
            .or_else(|_| STANDARD_LENIENT.decode(token))
            .map_err(|e| Error::InvalidCursor(format!("not valid base64: {}", e)))?;

        let json: Json = serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidCursor(format!("not valid JSON: {}", e)))?;
        let Json::Object(fields) = json else {
            return Err(Error::InvalidCursor("cursor must be a JSON object".into()));
        };
        check_id(&fields)?;

        Ok(Self { fields })
    }
}

impl From<Map<String, Json>> for Cursor {
    fn from(fields: Map<String, Json>) -> Self {
        Self { fields }
    }
}

fn check_id(fields: &Map<String, Json>) -> Result<()> {
    match fields.get(ID_KEY) {
        None => Err(Error::InvalidCursor(format!(
            "cursor must contain an `{}` field",
            ID_KEY
        ))),
        Some(Json::Null) => Err(Error::InvalidCursor("cursor id is null".into())),
        Some(Json::String(s)) if s.is_empty() => {
            Err(Error::InvalidCursor("cursor id is empty".into()))
        }
        Some(_) => Ok(()),
    }
}
