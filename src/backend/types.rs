//! Wire types for the redaction service.
//!
//! Field names mirror the service's JSON contracts exactly, hence the
//! camelCase renames. Requests carry server-side paths; the client never
//! reads file contents itself.

use serde::{Deserialize, Serialize};

use crate::fields::RedactionMode;

/// Fill color for image redaction boxes. The service defaults to the same
/// pink; sending it explicitly keeps the payload self-describing.
pub const PINK_FILL: [u8; 3] = [255, 192, 203];

/// Body for the header-extraction and audio-metadata calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePathRequest {
    pub file_path: String,
}

/// Body for the entity-detection call. The output path is optional; when
/// absent the service writes its preview next to the input file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetectionRequest {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// Body for the folder-listing call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListingRequest {
    pub folder_path: String,
}

/// One field the user elected to keep in the redaction request, with its
/// ordinal prefix already stripped. `mode` is null when the field is listed
/// but carries no treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedField {
    pub name: String,
    pub mode: Option<RedactionMode>,
    pub prompt: String,
}

/// Body for the tabular mask/obfuscate call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRedactionRequest {
    pub file_name: String,
    pub headers: Vec<SelectedField>,
    pub output_path: String,
    pub input_path: String,
}

/// Body for the image redaction call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRedactionRequest {
    pub file_path: String,
    pub entities: Vec<String>,
    pub fill_color: [u8; 3],
}

/// Body for the audio-processing call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRedactionRequest {
    pub file_path: String,
    pub output_path: String,
}

/// Header-extraction reply. A missing `headers` array is a decode failure,
/// not an empty classification.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadersResponse {
    pub headers: Vec<String>,
}

/// Entity-detection reply. The service also reports the preview artifact it
/// wrote; classification only consumes the entity list.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitiesResponse {
    pub entities: Vec<String>,
}

/// Audio-metadata reply, taken verbatim; a reply without the array counts as
/// zero fields.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioFieldsResponse {
    #[serde(default)]
    pub headers: Vec<String>,
}

/// Folder-listing reply: server-side paths of candidate files.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderListingResponse {
    pub files: Vec<String>,
}

/// Reply of every redaction call: the produced artifact's filename, when the
/// operation yields one.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactResponse {
    #[serde(default)]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_request_wire_shape() {
        let request = CsvRedactionRequest {
            file_name: "people.csv".to_string(),
            headers: vec![SelectedField {
                name: "ssn".to_string(),
                mode: Some(RedactionMode::Mask),
                prompt: String::new(),
            }],
            output_path: "/out".to_string(),
            input_path: "/in".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fileName"], "people.csv");
        assert_eq!(json["headers"][0]["name"], "ssn");
        assert_eq!(json["headers"][0]["mode"], "mask");
        assert_eq!(json["outputPath"], "/out");
        assert_eq!(json["inputPath"], "/in");
    }

    #[test]
    fn test_unset_mode_serializes_as_null() {
        let field = SelectedField {
            name: "name".to_string(),
            mode: None,
            prompt: String::new(),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert!(json["mode"].is_null());
    }

    #[test]
    fn test_entity_detection_omits_missing_output_path() {
        let request = EntityDetectionRequest {
            file_path: "/srv/scan.png".to_string(),
            output_path: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["filePath"], "/srv/scan.png");
        assert!(json.get("outputPath").is_none());
    }

    #[test]
    fn test_image_request_carries_pink_fill() {
        let request = ImageRedactionRequest {
            file_path: "/srv/scan.png".to_string(),
            entities: vec!["face".to_string()],
            fill_color: PINK_FILL,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fillColor"], serde_json::json!([255, 192, 203]));
    }

    #[test]
    fn test_artifact_response_filename_is_optional() {
        let reply: ArtifactResponse = serde_json::from_str("{}").unwrap();
        assert!(reply.filename.is_none());

        let reply: ArtifactResponse =
            serde_json::from_str(r#"{"filename":"people_redacted.csv","output":"/out/x"}"#)
                .unwrap();
        assert_eq!(reply.filename.as_deref(), Some("people_redacted.csv"));
    }
}
