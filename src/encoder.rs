//! Submission encoding: flattening a content record into the indexed
//! key/value list the multipart endpoint consumes.
//!
//! The wire contract is exact. Collections of records become
//! `key[i].subfield` entries in original order; collections of scalars
//! become `key[0]`, `key[1]`, …; file collections repeat the bare key.
//! Empty strings and nulls are omitted entirely, while explicit `false` and
//! `0` are kept: an absent key means "not provided", a falsy value means
//! "provided and set".

use crate::model::{FileValue, LocalizedEntity};

/// A binary payload destined for one multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// A value attached to a submission key before flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    File(FilePart),
    FileList(Vec<FilePart>),
    List(Vec<SubmissionValue>),
    Record(Vec<(String, SubmissionValue)>),
}

/// One flattened entry: either a text part or a file part.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
    Text(String),
    File(FilePart),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedField {
    pub key: String,
    pub value: EncodedValue,
}

/// Flatten a keyed value set into the ordered part list.
pub fn encode(fields: &[(String, SubmissionValue)]) -> Vec<EncodedField> {
    let mut out = Vec::new();
    for (key, value) in fields {
        emit(key, value, &mut out);
    }
    out
}

fn push_text(out: &mut Vec<EncodedField>, key: &str, value: String) {
    out.push(EncodedField {
        key: key.to_string(),
        value: EncodedValue::Text(value),
    });
}

fn emit(key: &str, value: &SubmissionValue, out: &mut Vec<EncodedField>) {
    match value {
        SubmissionValue::Null => {}
        // An empty string means "not provided"; explicit false/0 still go out
        SubmissionValue::Text(text) if text.is_empty() => {}
        SubmissionValue::Text(text) => push_text(out, key, text.clone()),
        SubmissionValue::Bool(value) => push_text(out, key, value.to_string()),
        SubmissionValue::Int(value) => push_text(out, key, value.to_string()),
        SubmissionValue::File(file) => out.push(EncodedField {
            key: key.to_string(),
            value: EncodedValue::File(file.clone()),
        }),
        SubmissionValue::FileList(files) => {
            for file in files {
                out.push(EncodedField {
                    key: key.to_string(),
                    value: EncodedValue::File(file.clone()),
                });
            }
        }
        SubmissionValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                match item {
                    SubmissionValue::Record(pairs) => {
                        for (name, nested) in pairs {
                            emit(&format!("{}[{}].{}", key, index, name), nested, out);
                        }
                    }
                    other => emit(&format!("{}[{}]", key, index), other, out),
                }
            }
        }
        // A structured value outside a collection travels as one canonical
        // text part
        SubmissionValue::Record(pairs) => push_text(out, key, canonical_text(pairs)),
    }
}

/// Stably ordered textual form for a structured value (JSON with sorted
/// keys).
fn canonical_text(pairs: &[(String, SubmissionValue)]) -> String {
    to_json(&SubmissionValue::Record(pairs.to_vec())).to_string()
}

fn to_json(value: &SubmissionValue) -> serde_json::Value {
    match value {
        SubmissionValue::Null => serde_json::Value::Null,
        SubmissionValue::Bool(value) => serde_json::Value::Bool(*value),
        SubmissionValue::Int(value) => serde_json::Value::from(*value),
        SubmissionValue::Text(text) => serde_json::Value::String(text.clone()),
        SubmissionValue::File(file) => serde_json::Value::String(file.file_name.clone()),
        SubmissionValue::FileList(files) => serde_json::Value::Array(
            files
                .iter()
                .map(|f| serde_json::Value::String(f.file_name.clone()))
                .collect(),
        ),
        SubmissionValue::List(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
        SubmissionValue::Record(pairs) => {
            let mut sorted: Vec<&(String, SubmissionValue)> = pairs.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(
                sorted
                    .into_iter()
                    .map(|(name, value)| (name.clone(), to_json(value)))
                    .collect(),
            )
        }
    }
}

/// The submission field set for a content record: file payload, scalar
/// attributes, the localization array, and any attached sub-entities.
pub fn entity_fields(entity: &LocalizedEntity) -> Vec<(String, SubmissionValue)> {
    let mut fields = Vec::new();

    match &entity.file {
        Some(FileValue::Upload {
            file_name,
            content_type,
            data,
        }) => fields.push((
            "file".to_string(),
            SubmissionValue::File(FilePart {
                file_name: file_name.clone(),
                content_type: content_type.clone(),
                data: data.clone(),
            }),
        )),
        // A stored file is kept by leaving its key out of the submission
        Some(FileValue::Existing { .. }) | None => {}
    }

    fields.push(("sortOrder".to_string(), SubmissionValue::Int(entity.sort_order)));
    fields.push((
        "link".to_string(),
        entity
            .link
            .clone()
            .map(SubmissionValue::Text)
            .unwrap_or(SubmissionValue::Null),
    ));

    let localizations = entity
        .localizations
        .iter()
        .map(|record| {
            let mut pairs = vec![(
                "languageCode".to_string(),
                SubmissionValue::Text(record.language.as_str().to_string()),
            )];
            for spec in entity.kind.field_set() {
                pairs.push((
                    spec.name.key().to_string(),
                    SubmissionValue::Text(record.get(spec.name).to_string()),
                ));
            }
            SubmissionValue::Record(pairs)
        })
        .collect();
    fields.push(("localizations".to_string(), SubmissionValue::List(localizations)));

    if !entity.nested.is_empty() {
        fields.push((
            "assets".to_string(),
            SubmissionValue::List(
                entity
                    .nested
                    .iter()
                    .map(|nested| SubmissionValue::Record(entity_fields(nested)))
                    .collect(),
            ),
        ));
    }

    fields
}

/// Flatten a content record straight to the part list.
pub fn encode_entity(entity: &LocalizedEntity) -> Vec<EncodedField> {
    encode(&entity_fields(entity))
}

/// Assemble the flattened parts into a multipart form body.
pub fn to_multipart_form(
    fields: Vec<EncodedField>,
) -> Result<reqwest::multipart::Form, reqwest::Error> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field.value {
            EncodedValue::Text(value) => form.text(field.key, value),
            EncodedValue::File(file) => {
                let mut part =
                    reqwest::multipart::Part::bytes(file.data).file_name(file.file_name);
                if let Some(content_type) = &file.content_type {
                    part = part.mime_str(content_type)?;
                }
                form.part(field.key, part)
            }
        };
    }
    Ok(form)
}
