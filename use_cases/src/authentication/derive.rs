//! Maps heterogeneous provider profile encodings onto local account
//! fields.

use anyhow::anyhow;
use entities::accounts::{AccountEmail, GenderCategory, NewAccountFields, Provider};

use super::{AuthenticationError, ExternalProfile};

/// Extracts the required profile attributes and derives the fields a new
/// (or matched) account is keyed on. Each absent attribute is reported
/// as its own `ProfileFieldMissing` error.
pub fn derive_account_fields(
    profile: &ExternalProfile,
    provider: Provider,
    current_year: i32,
) -> Result<NewAccountFields, AuthenticationError> {
    let email = profile
        .email
        .clone()
        .ok_or(AuthenticationError::ProfileFieldMissing { field: "email" })?;
    let email =
        AccountEmail::try_from(email).map_err(|err| AuthenticationError::Internal(anyhow!(err)))?;

    let gender_code = profile
        .gender
        .as_deref()
        .ok_or(AuthenticationError::ProfileFieldMissing { field: "gender" })?;
    let gender = gender_category_from_code(gender_code);

    let age_range = profile
        .age_range
        .as_deref()
        .ok_or(AuthenticationError::ProfileFieldMissing { field: "age" })?;
    let birth_year = estimate_birth_year(age_range, current_year);

    Ok(NewAccountFields {
        email,
        gender,
        birth_year,
        provider,
    })
}

/// `M` and `F` are the only codes the provider documents; anything else
/// maps to `Unknown`.
pub fn gender_category_from_code(code: &str) -> GenderCategory {
    match code {
        "M" => GenderCategory::Man,
        "F" => GenderCategory::Woman,
        _ => GenderCategory::Unknown,
    }
}

/// Estimates a birth year from an age-range string such as `"20-29"`:
/// sum the boundaries, halve with integer division, subtract from the
/// current year and add one. A non-numeric boundary doubles the running
/// sum instead of contributing a parsed value; changing that would shift
/// birth years already persisted for existing accounts.
pub fn estimate_birth_year(age_range: &str, current_year: i32) -> i32 {
    let mut age: i32 = 0;
    for boundary in age_range.split('-') {
        match boundary.parse::<i32>() {
            Ok(bound) => age += bound,
            Err(_) => age += age,
        }
    }
    age /= 2;
    current_year - age + 1
}

#[cfg(test)]
mod tests {
    use entities::accounts::{GenderCategory, Provider};

    use super::{derive_account_fields, estimate_birth_year, gender_category_from_code};
    use crate::authentication::{AuthenticationError, ExternalProfile};

    fn full_profile() -> ExternalProfile {
        ExternalProfile {
            email: Some("buyer@example.com".to_string()),
            gender: Some("F".to_string()),
            age_range: Some("20-29".to_string()),
        }
    }

    #[test]
    fn test_gender_code_mapping() {
        assert_eq!(gender_category_from_code("M"), GenderCategory::Man);
        assert_eq!(gender_category_from_code("F"), GenderCategory::Woman);
        assert_eq!(gender_category_from_code("X"), GenderCategory::Unknown);
        assert_eq!(gender_category_from_code(""), GenderCategory::Unknown);
    }

    #[test]
    fn test_birth_year_for_a_twenties_age_range() {
        // 20 + 29 = 49, halved to 24.
        assert_eq!(estimate_birth_year("20-29", 2020), 2020 - 24 + 1);
    }

    #[test]
    fn test_birth_year_for_a_single_boundary() {
        assert_eq!(estimate_birth_year("40", 2020), 2020 - 20 + 1);
    }

    #[test]
    fn test_non_numeric_boundary_doubles_the_running_sum() {
        // "thirty" is not numeric: 0 + 29 = 29, then halved to 14.
        assert_eq!(estimate_birth_year("thirty-29", 2020), 2020 - 14 + 1);
        // Trailing empty boundary doubles 60 to 120, halved to 60.
        assert_eq!(estimate_birth_year("60-", 2020), 2020 - 60 + 1);
    }

    #[test]
    fn test_derivation_uses_every_profile_field() {
        let fields = derive_account_fields(&full_profile(), Provider::Naver, 2020).unwrap();
        assert_eq!(fields.email.as_ref(), "buyer@example.com");
        assert_eq!(fields.gender, GenderCategory::Woman);
        assert_eq!(fields.birth_year, 2020 - 24 + 1);
        assert_eq!(fields.provider, Provider::Naver);
    }

    #[test]
    fn test_each_missing_field_is_reported_by_name() {
        let mut profile = full_profile();
        profile.email = None;
        let result = derive_account_fields(&profile, Provider::Naver, 2020);
        assert!(matches!(
            result,
            Err(AuthenticationError::ProfileFieldMissing { field: "email" })
        ));

        let mut profile = full_profile();
        profile.gender = None;
        let result = derive_account_fields(&profile, Provider::Naver, 2020);
        assert!(matches!(
            result,
            Err(AuthenticationError::ProfileFieldMissing { field: "gender" })
        ));

        let mut profile = full_profile();
        profile.age_range = None;
        let result = derive_account_fields(&profile, Provider::Naver, 2020);
        assert!(matches!(
            result,
            Err(AuthenticationError::ProfileFieldMissing { field: "age" })
        ));
    }
}
