//! Form validation
//!
//! Turns the raw text payload submitted by the presentation layer into a
//! `GenerationRequest`, collecting per-field messages instead of stopping at
//! the first problem.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{Category, GenerationRequest};

const PRODUCT_NAME_REQUIRED: &str = "商品名は必須です。";
const MANUFACTURER_REQUIRED: &str = "製造者名は必須です。";
const CATEGORY_INVALID: &str = "種別は「牛乳」「加工乳」「乳飲料」のいずれかを選択してください。";
const NUMBER_REQUIRED: &str = "数値を入力してください。";
const NUMBER_NEGATIVE: &str = "0以上の数値を入力してください。";

/// Raw form payload, every field still text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationForm {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub non_fat_solid: Option<String>,
    pub milk_fat: Option<String>,
    pub manufacturer: Option<String>,
}

/// Field-level validation failures, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn messages_for(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One line per field: `field: message, message`
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl GenerationForm {
    /// Build from form entries such as a decoded `application/x-www-form-urlencoded` body.
    /// Unknown keys are ignored; a repeated key keeps its last value.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in entries {
            let slot = match key.as_ref() {
                "productName" => &mut form.product_name,
                "category" => &mut form.category,
                "nonFatSolid" => &mut form.non_fat_solid,
                "milkFat" => &mut form.milk_fat,
                "manufacturer" => &mut form.manufacturer,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        form
    }

    pub fn validate(&self) -> Result<GenerationRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let product_name = required_text(
            &self.product_name,
            "productName",
            PRODUCT_NAME_REQUIRED,
            &mut errors,
        );
        let manufacturer = required_text(
            &self.manufacturer,
            "manufacturer",
            MANUFACTURER_REQUIRED,
            &mut errors,
        );

        let category = match self.category.as_deref().map(Category::from_label) {
            Some(Some(category)) => Some(category),
            _ => {
                errors.add("category", CATEGORY_INVALID);
                None
            }
        };

        let non_fat_solid = non_negative_number(&self.non_fat_solid, "nonFatSolid", &mut errors);
        let milk_fat = non_negative_number(&self.milk_fat, "milkFat", &mut errors);

        match (product_name, category, non_fat_solid, milk_fat, manufacturer) {
            (
                Some(product_name),
                Some(category),
                Some(non_fat_solid),
                Some(milk_fat),
                Some(manufacturer),
            ) if errors.is_empty() => {
                Ok(GenerationRequest {
                    product_name,
                    category,
                    non_fat_solid,
                    milk_fat,
                    manufacturer,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    value: &Option<String>,
    field: &str,
    message: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        Some(text) if !text.is_empty() => Some(text.clone()),
        _ => {
            errors.add(field, message);
            None
        }
    }
}

fn non_negative_number(
    value: &Option<String>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match value.as_deref().map(coerce_number) {
        Some(Some(n)) if n >= 0.0 => Some(n),
        Some(Some(_)) => {
            errors.add(field, NUMBER_NEGATIVE);
            None
        }
        _ => {
            errors.add(field, NUMBER_REQUIRED);
            None
        }
    }
}

/// Text-to-number coercion for form input.
///
/// Surrounding whitespace is ignored and a blank field reads as zero, the way
/// browser form numbers coerce. Unsigned `0x`, `0o` and `0b` integer literals
/// are accepted as well. Non-finite values are rejected.
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if let Some(n) = radix_literal(trimmed) {
        return n;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `Some(parsed)` when the text carries a radix prefix, `None` otherwise
fn radix_literal(text: &str) -> Option<Option<f64>> {
    let (prefix, digits) = (text.get(..2)?, text.get(2..)?);
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(None);
    }
    let value = digits.chars().fold(0.0, |acc, c| {
        acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
    });
    Some(Some(value).filter(|n: &f64| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> GenerationForm {
        GenerationForm::from_entries([
            ("productName", "おいしい牛乳"),
            ("category", "牛乳"),
            ("nonFatSolid", "8.3"),
            ("milkFat", "3.8"),
            ("manufacturer", "明治"),
        ])
    }

    #[test]
    fn test_valid_form() {
        let request = valid_form().validate().unwrap();
        assert_eq!(request.product_name, "おいしい牛乳");
        assert_eq!(request.category, Category::Milk);
        assert_eq!(request.non_fat_solid, 8.3);
        assert_eq!(request.milk_fat, 3.8);
        assert_eq!(request.manufacturer, "明治");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = GenerationForm::default().validate().unwrap_err();
        assert_eq!(errors.messages_for("productName"), [PRODUCT_NAME_REQUIRED]);
        assert_eq!(errors.messages_for("manufacturer"), [MANUFACTURER_REQUIRED]);
        assert_eq!(errors.messages_for("category"), [CATEGORY_INVALID]);
        assert_eq!(errors.messages_for("nonFatSolid"), [NUMBER_REQUIRED]);
        assert_eq!(errors.messages_for("milkFat"), [NUMBER_REQUIRED]);
        assert_eq!(errors.fields().len(), 5);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut form = valid_form();
        form.category = Some("ヨーグルト".into());
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert!(!errors.messages_for("category").is_empty());
    }

    #[test]
    fn test_negative_number_rejected() {
        let mut form = valid_form();
        form.milk_fat = Some("-0.1".into());
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.messages_for("milkFat"), [NUMBER_NEGATIVE]);
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(coerce_number(" 3.5 "), Some(3.5));
        assert_eq!(coerce_number(""), Some(0.0));
        assert_eq!(coerce_number("abc"), None);
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("NaN"), None);
    }

    #[test]
    fn test_radix_prefixed_numbers() {
        assert_eq!(coerce_number("0x1A"), Some(26.0));
        assert_eq!(coerce_number(" 0B11 "), Some(3.0));
        assert_eq!(coerce_number("0o7"), Some(7.0));
        assert_eq!(coerce_number("0x"), None);
        assert_eq!(coerce_number("0b12"), None);
        assert_eq!(coerce_number("0x+1"), None);
        assert_eq!(coerce_number("-0x1A"), None);
        assert_eq!(coerce_number("0.5"), Some(0.5));
    }

    #[test]
    fn test_blank_number_reads_as_zero() {
        let mut form = valid_form();
        form.non_fat_solid = Some("".into());
        assert_eq!(form.validate().unwrap().non_fat_solid, 0.0);
    }

    #[test]
    fn test_summary_lists_fields() {
        let mut form = valid_form();
        form.product_name = Some(String::new());
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.summary(),
            format!("productName: {}", PRODUCT_NAME_REQUIRED)
        );
        assert_eq!(errors.to_string(), errors.summary());
    }

    #[test]
    fn test_deserialize_from_camel_case_json() {
        let form: GenerationForm = serde_json::from_value(serde_json::json!({
            "productName": "特濃",
            "category": "加工乳",
            "nonFatSolid": "9.0",
            "milkFat": "4.4",
            "manufacturer": "タカナシ乳業"
        }))
        .unwrap();
        assert_eq!(form.validate().unwrap().category, Category::ProcessedMilk);
    }
}
