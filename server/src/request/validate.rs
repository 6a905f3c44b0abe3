//! Field checks for JSON request bodies.
//!
//! Values are coerced the lenient way browsers send them (numbers may
//! arrive as strings, dates as `YYYY-MM-DD`), normalized, then checked. Every
//! problem is collected so a client sees all of them in one response.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

static ISBN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d[- ]?){9}[\dXx]$|^(?:\d[- ]?){13}$|^\d{9}[\dXx]$|^\d{13}$")
        .expect("valid regex")
});

const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field: String,
    message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Isbn,
    Email,
}

impl Pattern {
    fn matches(&self, value: &str) -> bool {
        match self {
            // separators are allowed anywhere in an ISBN
            Pattern::Isbn => ISBN.is_match(&value.replace(['-', ' '], "")),
            Pattern::Email => EMAIL.is_match(value),
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Pattern::Isbn => "ISBN must be a valid ISBN-10 or ISBN-13 format",
            Pattern::Email => "Email must be a valid email address",
        }
    }
}

/// Rules for one string field.
#[derive(Debug, Clone, Copy)]
pub struct Text {
    required: bool,
    trim: bool,
    capitalize: bool,
    min: Option<usize>,
    max: Option<usize>,
    pattern: Option<Pattern>,
}

impl Text {
    pub const fn required() -> Self {
        Self {
            required: true,
            trim: false,
            capitalize: false,
            min: None,
            max: None,
            pattern: None,
        }
    }

    pub const fn optional() -> Self {
        Self {
            required: false,
            ..Self::required()
        }
    }

    pub const fn trimmed(self) -> Self {
        Self { trim: true, ..self }
    }

    pub const fn capitalized(self) -> Self {
        Self {
            capitalize: true,
            ..self
        }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..self
        }
    }

    pub const fn max_length(self, max: usize) -> Self {
        Self {
            max: Some(max),
            ..self
        }
    }

    pub const fn pattern(self, pattern: Pattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..self
        }
    }
}

pub struct Fields<'a> {
    body: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub fn of(body: &'a Value) -> Result<Self, Vec<FieldError>> {
        match body.as_object() {
            Some(body) => Ok(Self {
                body,
                errors: Vec::new(),
            }),
            None => Err(vec![FieldError::new(
                "body",
                "Request body must be a JSON object",
            )]),
        }
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field() == field)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.body.get(field).filter(|value| !value.is_null())
    }

    fn absent(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        let value = self.get(field);
        let blank = matches!(value, Some(Value::String(text)) if text.is_empty());
        if required && (value.is_none() || blank) {
            self.reject(field, format!("{field} is required"));
            return None;
        }
        value
    }

    pub fn text(&mut self, field: &str, rule: Text) -> Option<String> {
        let value = self.absent(field, rule.required)?;
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => {
                self.reject(field, format!("{field} must be a valid string"));
                return None;
            }
        };
        let text = if rule.trim {
            text.trim().to_string()
        } else {
            text
        };
        let text = if rule.capitalize {
            capitalize(&text)
        } else {
            text
        };

        let before = self.errors.len();
        let length = text.chars().count();
        if let Some(min) = rule.min {
            if length < min {
                self.reject(
                    field,
                    format!("{field} must be at least {min} characters long"),
                );
            }
        }
        if let Some(max) = rule.max {
            if length > max {
                self.reject(
                    field,
                    format!("{field} must be at most {max} characters long"),
                );
            }
        }
        if let Some(pattern) = rule.pattern {
            if !pattern.matches(&text) {
                self.reject(field, pattern.message());
            }
        }
        (self.errors.len() == before).then_some(text)
    }

    fn number(&mut self, field: &str, required: bool) -> Option<f64> {
        let value = self.absent(field, required)?;
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(number) = number.filter(|number| number.is_finite()) else {
            self.reject(field, format!("{field} must be a valid number: Invalid number"));
            return None;
        };
        Some(number)
    }

    /// A non-negative whole number such as a copy count.
    pub fn count(&mut self, field: &str, required: bool) -> Option<u32> {
        let number = self.number(field, required)?;
        if number < 0.0 {
            self.reject(field, format!("{field} must be at least 0"));
            return None;
        }
        if number.fract() != 0.0 || number > f64::from(u32::MAX) {
            self.reject(field, format!("{field} must be a whole number"));
            return None;
        }
        Some(number as u32)
    }

    /// A required reference to another record.
    ///
    /// Integers are read exactly; only inputs that are not plain integers
    /// fall back to the floating point path.
    pub fn id(&mut self, field: &str) -> Option<i64> {
        let exact = match self.get(field) {
            Some(Value::Number(number)) => number.as_i64(),
            Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
            _ => None,
        };
        let id = match exact {
            Some(id) => id,
            None => {
                let number = self.number(field, true)?;
                if number < 1.0 {
                    self.reject(field, format!("{field} must be at least 1"));
                    return None;
                }
                // beyond 2^53 a float no longer names a single integer
                if number.fract() != 0.0 || number > MAX_EXACT_FLOAT {
                    self.reject(field, format!("{field} must be a whole number"));
                    return None;
                }
                number as i64
            }
        };
        if id < 1 {
            self.reject(field, format!("{field} must be at least 1"));
            return None;
        }
        Some(id)
    }

    /// A date no later than now, as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
    pub fn past_date(&mut self, field: &str, required: bool) -> Option<OffsetDateTime> {
        let value = self.absent(field, required)?;
        let Some(date) = value.as_str().and_then(parse_date) else {
            self.reject(field, format!("{field} must be a valid date: Invalid date"));
            return None;
        };
        if date > OffsetDateTime::now_utc() {
            self.reject(field, format!("{field} cannot be in the future"));
            return None;
        }
        Some(date)
    }
}

fn parse_date(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(date) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date);
    }
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
