//! Options form: an ordered set of fields rendered and normalized together

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::error::FormError;
use super::field::{Field, TypeDescriptor};
use super::value::FieldValue;

/// Styling emitted once ahead of the fields so invalid inputs show up red
pub const VALIDATION_STYLE: &str =
    "<style>.form-control:invalid {border-color:red;color:red;}</style>\n";

/// Raw form data: every submitted value keyed by field name
pub type Submission = HashMap<String, Vec<FieldValue>>;

/// Submitted values per field, `None` where nothing was submitted
pub type RawOptions = IndexMap<String, Option<Vec<FieldValue>>>;

/// Normalized option per field, in field order
pub type NormalizedOptions = IndexMap<String, Option<FieldValue>>;

/// Decode an `application/x-www-form-urlencoded` body; repeated keys append
pub fn submission_from_query(body: &str) -> Submission {
    let mut submission = Submission::new();
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        submission
            .entry(key.into_owned())
            .or_default()
            .push(FieldValue::Text(value.into_owned()));
    }
    submission
}

/// An immutable, ordered collection of uniquely named fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsForm {
    fields: Vec<Field>,
}

impl OptionsForm {
    /// Build a form; field names must be unique
    pub fn new(fields: Vec<Field>) -> Result<Self, FormError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(FormError::DuplicateField(field.name().to_string()));
            }
        }
        debug!(fields = fields.len(), "built options form");
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn get_field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Validation style followed by each field's markup, newline joined
    pub fn render(&self) -> String {
        std::iter::once(VALIDATION_STYLE.to_string())
            .chain(self.fields.iter().map(Field::render))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Pull each field's raw values out of the submission, untouched
    pub fn extract_raw(&self, submission: &Submission) -> RawOptions {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), submission.get(f.name()).cloned()))
            .collect()
    }

    /// Normalize every field; the first failure aborts the whole form
    pub fn normalize(&self, submission: &Submission) -> Result<NormalizedOptions, FormError> {
        let mut options = NormalizedOptions::with_capacity(self.fields.len());
        for field in &self.fields {
            let raw = submission.get(field.name()).map(Vec::as_slice);
            let value = field.normalize(raw).inspect_err(|err| {
                warn!(field = %field.name(), error = %err, "rejected form submission");
            })?;
            options.insert(field.name().to_string(), value);
        }
        Ok(options)
    }

    /// Same as [`Self::normalize`] but over already extracted raw options
    pub fn normalize_raw(&self, raw: &RawOptions) -> Result<NormalizedOptions, FormError> {
        let submission: Submission = raw
            .iter()
            .filter_map(|(name, values)| values.clone().map(|v| (name.clone(), v)))
            .collect();
        self.normalize(&submission)
    }

    /// Type descriptor per field, in field order
    pub fn describe(&self) -> IndexMap<String, TypeDescriptor> {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.describe()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Choice;

    fn two_text_fields() -> OptionsForm {
        OptionsForm::new(vec![
            Field::builder("text_attr_1")
                .label("First Input")
                .text()
                .unwrap(),
            Field::builder("text_attr_2")
                .label("Second Input")
                .text()
                .unwrap(),
        ])
        .unwrap()
    }

    fn submission(pairs: &[(&str, &[&str])]) -> Submission {
        pairs
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| FieldValue::from(*v)).collect(),
                )
            })
            .collect()
    }

    mod construction {
        use super::*;

        #[test]
        fn test_duplicate_names_rejected() {
            let err = OptionsForm::new(vec![
                Field::builder("a").text().unwrap(),
                Field::builder("a").numeric().unwrap(),
            ])
            .unwrap_err();
            assert_eq!(err, FormError::DuplicateField("a".into()));
        }

        #[test]
        fn test_lookup() {
            let form = two_text_fields();
            assert_eq!(form.field_count(), 2);
            assert_eq!(form.get_field(1).unwrap().name(), "text_attr_2");
            assert!(form.get_field(2).is_none());
            assert_eq!(form.field("text_attr_1").unwrap().label(), "First Input");
            assert!(form.field("missing").is_none());
        }
    }

    mod render {
        use super::*;

        #[test]
        fn test_render_two_text_fields() {
            let form = two_text_fields();
            let expected = [
                VALIDATION_STYLE.to_string(),
                form.fields()[0].render(),
                form.fields()[1].render(),
            ]
            .join("\n");
            assert_eq!(form.render(), expected);
        }

        #[test]
        fn test_render_empty_form_is_style_only() {
            let form = OptionsForm::default();
            assert_eq!(form.render(), VALIDATION_STYLE);
        }
    }

    mod extract_raw {
        use super::*;

        #[test]
        fn test_get_options_from_form() {
            let form = two_text_fields();
            let data = submission(&[("text_attr_1", &["test1"]), ("text_attr_2", &["test2"])]);
            let options = form.extract_raw(&data);
            assert_eq!(options["text_attr_1"], Some(vec![FieldValue::from("test1")]));
            assert_eq!(options["text_attr_2"], Some(vec![FieldValue::from("test2")]));
        }

        #[test]
        fn test_get_options_from_empty_form() {
            let form = two_text_fields();
            let options = form.extract_raw(&Submission::new());
            assert_eq!(options.len(), 2);
            assert!(options.values().all(Option::is_none));
        }

        #[test]
        fn test_unknown_keys_dropped() {
            let form = two_text_fields();
            let data = submission(&[("other", &["x"])]);
            let options = form.extract_raw(&data);
            assert!(!options.contains_key("other"));
        }
    }

    mod normalize {
        use super::*;

        #[test]
        fn test_get_normalized_options() {
            let form = OptionsForm::new(vec![Field::builder("text_attr")
                .label("First Input")
                .text()
                .unwrap()])
            .unwrap();
            let options = form
                .normalize(&submission(&[("text_attr", &["test"])]))
                .unwrap();
            assert_eq!(options["text_attr"], Some(FieldValue::from("test")));
        }

        #[test]
        fn test_first_failure_aborts() {
            let form = OptionsForm::new(vec![
                Field::builder("name").text().unwrap(),
                Field::builder("cores")
                    .label("Cores")
                    .required(true)
                    .numeric()
                    .unwrap(),
            ])
            .unwrap();
            let err = form
                .normalize(&submission(&[("name", &["job"]), ("cores", &[""])]))
                .unwrap_err();
            assert_eq!(err.to_string(), "Required field cannot be empty: Cores.");
        }

        #[test]
        fn test_output_keeps_field_order() {
            let form = OptionsForm::new(vec![
                Field::builder("z").text().unwrap(),
                Field::builder("a").checkbox().unwrap(),
            ])
            .unwrap();
            let options = form.normalize(&Submission::new()).unwrap();
            let names: Vec<_> = options.keys().cloned().collect();
            assert_eq!(names, vec!["z", "a"]);
            assert_eq!(options["a"], Some(FieldValue::Boolean(false)));
        }

        #[test]
        fn test_normalize_raw_matches_normalize() {
            let form = two_text_fields();
            let data = submission(&[("text_attr_1", &["x"])]);
            let raw = form.extract_raw(&data);
            assert_eq!(form.normalize_raw(&raw).unwrap(), form.normalize(&data).unwrap());
        }

        #[test]
        fn test_defaults_round_trip() {
            let form = OptionsForm::new(vec![
                Field::builder("user").value("jovyan").text().unwrap(),
                Field::builder("cores").value(2).numeric().unwrap(),
                Field::builder("mem").value(1.5).attr("step", 0.5).numeric().unwrap(),
                Field::builder("gpu").checked(true).checkbox().unwrap(),
                Field::builder("queue")
                    .select(
                        vec![Choice::new("short", "Short"), Choice::new("long", "Long")],
                        Some("long".into()),
                    )
                    .unwrap(),
            ])
            .unwrap();
            let data = submission(&[
                ("user", &["jovyan"]),
                ("cores", &["2"]),
                ("mem", &["1.5"]),
                ("gpu", &["on"]),
                ("queue", &["long"]),
            ]);
            let options = form.normalize(&data).unwrap();
            for field in form.fields() {
                assert_eq!(options[field.name()], field.default_value(), "{}", field.name());
            }
        }
    }

    mod query {
        use super::*;

        #[test]
        fn test_repeated_keys_append() {
            let data = submission_from_query("queue=short&tags=a&tags=b%20c&empty=");
            assert_eq!(data["queue"], vec![FieldValue::from("short")]);
            assert_eq!(
                data["tags"],
                vec![FieldValue::from("a"), FieldValue::from("b c")]
            );
            assert_eq!(data["empty"], vec![FieldValue::from("")]);
        }
    }

    #[test]
    fn test_describe_in_field_order() {
        let form = two_text_fields();
        let descriptors = form.describe();
        let names: Vec<_> = descriptors.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["text_attr_1", "text_attr_2"]);
    }
}
