//! Per-call request and template model.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::GeneratorError;
use crate::constants::{FIELD_NAME, FIELD_SERIAL_FORMAT};
use crate::serial::SerialFormatter;

#[derive(Clone)]
enum Field {
    Data(Value),
    Formatter(SerialFormatter),
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Data(v) => write!(f, "{v}"),
            Field::Formatter(_) => f.write_str("<serial formatter>"),
        }
    }
}

/// Fields substituted into the license template.
///
/// The `serialFormat` entry is reserved: it holds a [`SerialFormatter`]
/// that is taken out of the model before rendering. Putting plain data
/// under that key makes the request invalid.
#[derive(Clone, Debug, Default)]
pub struct Model {
    fields: IndexMap<String, Field>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from a JSON object.
    pub fn from_json(value: Value) -> Result<Self, GeneratorError> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().map(|(k, v)| (k, Field::Data(v))).collect(),
            }),
            _ => Err(GeneratorError::Validation(
                "model should be an object".to_string(),
            )),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), Field::Data(value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn set_serial_format(&mut self, format: SerialFormatter) {
        self.fields
            .insert(FIELD_SERIAL_FORMAT.to_string(), Field::Formatter(format));
    }

    pub fn with_serial_format(mut self, format: SerialFormatter) -> Self {
        self.set_serial_format(format);
        self
    }

    /// Data value of a field. Formatters are not visible here.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            Some(Field::Data(v)) => Some(v),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn has_serial_format(&self) -> bool {
        matches!(self.fields.get(FIELD_SERIAL_FORMAT), Some(Field::Formatter(_)))
    }

    /// Remove the `serialFormat` entry, rejecting one that isn't a formatter.
    pub(crate) fn take_serial_format(&mut self) -> Result<Option<SerialFormatter>, GeneratorError> {
        match self.fields.shift_remove(FIELD_SERIAL_FORMAT) {
            None => Ok(None),
            Some(Field::Formatter(f)) => Ok(Some(f)),
            Some(Field::Data(_)) => Err(GeneratorError::Validation(format!(
                "model.{FIELD_SERIAL_FORMAT} should be a function"
            ))),
        }
    }

    /// Template data: every data field, formatters dropped.
    pub(crate) fn into_data(self) -> Map<String, Value> {
        self.fields
            .into_iter()
            .filter_map(|(k, f)| match f {
                Field::Data(v) => Some((k, v)),
                Field::Formatter(_) => None,
            })
            .collect()
    }
}

/// One license to generate.
#[derive(Clone, Debug, Default)]
pub struct LicenseRequest {
    /// Data passed to the signing helper. Must not be empty.
    pub sign_this: String,
    /// Template text; `None` or empty selects the built-in template.
    pub template: Option<String>,
    /// Template fields. Without a model, `name` defaults to `sign_this`.
    pub model: Option<Model>,
}

impl LicenseRequest {
    pub fn new(sign_this: impl Into<String>) -> Self {
        Self {
            sign_this: sign_this.into(),
            ..Self::default()
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Build a request from an untyped JSON document.
    ///
    /// Expected shape: `{"signThis": "...", "template": "...", "model": {...}}`.
    /// Checks run in order: `signThis`, `model`, `model.serialFormat`,
    /// `template`. A formatter cannot be expressed in JSON, so any
    /// `model.serialFormat` entry is rejected.
    pub fn from_json(value: &Value) -> Result<Self, GeneratorError> {
        let obj = value.as_object().ok_or_else(|| {
            GeneratorError::Validation("request should be an object".to_string())
        })?;

        let sign_this = match obj.get("signThis") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(invalid_sign_this()),
        };

        let model = match obj.get("model") {
            None | Some(Value::Null) => None,
            Some(v) => Some(Model::from_json(v.clone())?),
        };
        if model.as_ref().is_some_and(|m| m.contains(FIELD_SERIAL_FORMAT)) {
            return Err(GeneratorError::Validation(format!(
                "model.{FIELD_SERIAL_FORMAT} should be a function"
            )));
        }

        let template = match obj.get("template") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(GeneratorError::Validation(
                    "template should be a string".to_string(),
                ));
            }
        };

        Ok(Self {
            sign_this,
            template,
            model,
        })
    }

    /// Name shown on the license: `model.name` if set, else `sign_this`.
    pub fn display_name(&self) -> String {
        self.model
            .as_ref()
            .and_then(|m| m.get(FIELD_NAME))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| self.sign_this.clone())
    }
}

pub(crate) fn invalid_sign_this() -> GeneratorError {
    GeneratorError::Validation("invalid data to be signed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial;
    use serde_json::json;

    #[test]
    fn from_json_full_request() {
        let req = LicenseRequest::from_json(&json!({
            "signThis": "Jane | jane@example.com",
            "template": "{{name}}",
            "model": {"name": "Jane", "email": "jane@example.com"},
        }))
        .unwrap();
        assert_eq!(req.sign_this, "Jane | jane@example.com");
        assert_eq!(req.template.as_deref(), Some("{{name}}"));
        let model = req.model.unwrap();
        assert_eq!(model.get("email"), Some(&json!("jane@example.com")));
    }

    #[test]
    fn from_json_rejects_bad_sign_this() {
        for doc in [
            json!({}),
            json!({"signThis": null}),
            json!({"signThis": 1}),
            json!({"signThis": {}}),
            json!({"signThis": ""}),
        ] {
            let err = LicenseRequest::from_json(&doc).unwrap_err();
            assert!(matches!(err, GeneratorError::Validation(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn from_json_rejects_non_object_model() {
        let err = LicenseRequest::from_json(&json!({"signThis": "x", "model": 1})).unwrap_err();
        assert!(err.to_string().contains("model should be an object"));
    }

    #[test]
    fn from_json_rejects_serial_format_data() {
        for sf in [json!({}), json!(1), json!("")] {
            let doc = json!({"signThis": "x", "model": {"serialFormat": sf}});
            let err = LicenseRequest::from_json(&doc).unwrap_err();
            assert!(err.to_string().contains("serialFormat"), "got: {err}");
        }
    }

    #[test]
    fn from_json_rejects_non_string_template() {
        for t in [json!(1), json!({})] {
            let doc = json!({"signThis": "x", "template": t});
            let err = LicenseRequest::from_json(&doc).unwrap_err();
            assert!(err.to_string().contains("template"), "got: {err}");
        }
    }

    #[test]
    fn from_json_checks_sign_this_before_template() {
        let err = LicenseRequest::from_json(&json!({"template": 1})).unwrap_err();
        assert!(err.to_string().contains("data to be signed"), "got: {err}");
    }

    #[test]
    fn take_serial_format_removes_formatter() {
        let mut model = Model::new()
            .with("name", "Jane")
            .with_serial_format(serial::columns(2, 2));
        assert!(model.has_serial_format());
        let f = model.take_serial_format().unwrap().unwrap();
        assert_eq!(f("abcdef"), "ab cd\nef");
        assert!(!model.contains(FIELD_SERIAL_FORMAT));
        assert_eq!(model.into_data().len(), 1);
    }

    #[test]
    fn take_serial_format_rejects_data() {
        let mut model = Model::new().with(FIELD_SERIAL_FORMAT, 1);
        assert!(model.take_serial_format().is_err());
    }

    #[test]
    fn display_name_prefers_model_name() {
        let req = LicenseRequest::new("Jane | jane@example.com");
        assert_eq!(req.display_name(), "Jane | jane@example.com");
        let req = req.with_model(Model::new().with("name", "Jane"));
        assert_eq!(req.display_name(), "Jane");
    }
}
