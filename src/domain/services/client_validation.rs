use crate::domain::entities::client::ClientDraft;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use time::Date;
use time::macros::format_description;

/// Which format `cellPhone` must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonePolicy {
    /// Exactly ten consecutive digits.
    #[default]
    TenDigits,
    /// Free-form phone number: optional leading `+`, digits and common
    /// separators, 7 to 15 digits in total.
    General,
}

/// A single failed rule on a named input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw candidate field set as received from a caller, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub corporate_name: Option<String>,
    pub cuit: Option<String>,
    pub birthdate: Option<String>,
    pub cell_phone: Option<String>,
    pub email: Option<String>,
}

/// Pure field-format validation for client candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientValidator {
    phone_policy: PhonePolicy,
}

impl ClientValidator {
    pub fn new(phone_policy: PhonePolicy) -> Self {
        Self { phone_policy }
    }

    pub fn phone_policy(&self) -> PhonePolicy {
        self.phone_policy
    }

    /// Check every field and build a draft, or return all failures at once.
    pub fn validate(&self, input: &ClientInput) -> Result<ClientDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        // Step 1: Required text fields.
        let first_name = required(&mut errors, "firstName", &input.first_name);
        let last_name = required(&mut errors, "lastName", &input.last_name);
        let corporate_name = required(&mut errors, "corporateName", &input.corporate_name);

        // Step 2: Formatted fields (required first, then pattern).
        let cuit = required(&mut errors, "cuit", &input.cuit);
        if cuit.as_deref().is_some_and(|v| !is_valid_cuit(v)) {
            errors.push(FieldError::new(
                "cuit",
                "Invalid CUIT. Must be XX-XXXXXXXX-X",
            ));
        }

        let cell_phone = required(&mut errors, "cellPhone", &input.cell_phone);
        if cell_phone
            .as_deref()
            .is_some_and(|v| !is_valid_phone(v, self.phone_policy))
        {
            let message = match self.phone_policy {
                PhonePolicy::TenDigits => "Invalid phone number. Must be 10 consecutive numbers only.",
                PhonePolicy::General => "Invalid phone number.",
            };
            errors.push(FieldError::new("cellPhone", message));
        }

        let email = required(&mut errors, "email", &input.email);
        if email.as_deref().is_some_and(|v| !is_valid_email(v)) {
            errors.push(FieldError::new("email", "Invalid email address."));
        }

        let birthdate = required(&mut errors, "birthdate", &input.birthdate);
        let birthdate = match birthdate.as_deref().map(parse_birthdate) {
            Some(Some(date)) => Some(date),
            Some(None) => {
                errors.push(FieldError::new(
                    "birthdate",
                    "Invalid date. Must be YYYY-MM-DD",
                ));
                None
            }
            None => None,
        };

        // Step 3: Either every field is present and valid, or report all failures.
        match (
            first_name,
            last_name,
            corporate_name,
            cuit,
            birthdate,
            cell_phone,
            email,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(corporate_name),
                Some(cuit),
                Some(birthdate),
                Some(cell_phone),
                Some(email),
            ) if errors.is_empty() => Ok(ClientDraft {
                first_name,
                last_name,
                corporate_name,
                cuit,
                birthdate,
                cell_phone,
                email,
            }),
            _ => Err(errors),
        }
    }
}

/// Presence check only: blank means missing, but a present value is kept verbatim.
fn required(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &Option<String>,
) -> Option<String> {
    match value.as_deref() {
        Some(v) if v.chars().any(char::is_control) => {
            errors.push(FieldError::new(
                field,
                format!("The {field} field contains invalid characters."),
            ));
            None
        }
        Some(v) if !v.trim().is_empty() => Some(v.to_string()),
        _ => {
            errors.push(FieldError::new(field, format!("The {field} field is required.")));
            None
        }
    }
}

fn cuit_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[0-9]{2}-[0-9]{8}-[0-9]$").expect("valid CUIT regex"))
}

fn ten_digit_phone_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"))
}

fn general_phone_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\+?[0-9\s().-]+$").expect("valid phone regex"))
}

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("valid email regex")
    })
}

pub fn is_valid_cuit(value: &str) -> bool {
    cuit_regex().is_match(value)
}

pub fn is_valid_phone(value: &str, policy: PhonePolicy) -> bool {
    match policy {
        PhonePolicy::TenDigits => ten_digit_phone_regex().is_match(value),
        PhonePolicy::General => {
            let digits = value.chars().filter(char::is_ascii_digit).count();
            general_phone_regex().is_match(value) && (7..=15).contains(&digits)
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Accepts `YYYY-MM-DD`, or a datetime whose time part is dropped.
pub fn parse_birthdate(raw: &str) -> Option<Date> {
    let date_part = raw.split_once('T').map_or(raw, |(date, _)| date);
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}
