use shared_kernel::{non_empty_string, uuid_key};

uuid_key!(AccountId);

non_empty_string!(Username);
non_empty_string!(AccountEmailInner);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountEmail(AccountEmailInner);

impl AsRef<str> for AccountEmail {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl TryFrom<String> for AccountEmail {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        use validator::validate_email;
        let non_empty_string = AccountEmailInner::try_from(value)?;

        let is_valid = validate_email(non_empty_string.as_ref());
        if is_valid {
            return Ok(AccountEmail(non_empty_string));
        }
        Err(format!("{} is an invalid email", non_empty_string.as_ref()))
    }
}

/// The external identity service an account was created through.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Provider {
    #[serde(rename = "NAVER")]
    Naver,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Naver => "NAVER",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Provider {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "NAVER" => Ok(Provider::Naver),
            other => Err(format!("{other} is not a known provider")),
        }
    }
}

/// Normalized gender category derived from a provider's gender code.
/// Codes outside the mapped set land on `Unknown` rather than failing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum GenderCategory {
    Man,
    Woman,
    Unknown,
}

impl GenderCategory {
    /// Database representation. `Unknown` is stored as NULL.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            GenderCategory::Man => Some("MAN"),
            GenderCategory::Woman => Some("WOMAN"),
            GenderCategory::Unknown => None,
        }
    }
}

impl From<Option<String>> for GenderCategory {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("MAN") => GenderCategory::Man,
            Some("WOMAN") => GenderCategory::Woman,
            _ => GenderCategory::Unknown,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Account {
    pub id: AccountId,
    pub email: AccountEmail,
    pub username: Username,
    pub gender: GenderCategory,
    pub birth_year: i32,
    pub provider: Provider,
}

/// Fields derived from an external profile, before a username is picked.
#[derive(Clone, Debug)]
pub struct NewAccountFields {
    pub email: AccountEmail,
    pub gender: GenderCategory,
    pub birth_year: i32,
    pub provider: Provider,
}

#[derive(Clone, Debug)]
pub struct NewAccount {
    pub email: AccountEmail,
    pub username: Username,
    pub gender: GenderCategory,
    pub birth_year: i32,
    pub provider: Provider,
}

impl NewAccount {
    pub fn new(fields: NewAccountFields, username: Username) -> Self {
        Self {
            email: fields.email,
            username,
            gender: fields.gender,
            birth_year: fields.birth_year,
            provider: fields.provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_is_accepted() {
        let email = AccountEmail::try_from("buyer@example.com".to_string());
        assert!(email.is_ok())
    }

    #[test]
    fn test_email_without_domain_is_rejected() {
        let email = AccountEmail::try_from("just-an-email.com".to_string());
        assert!(email.is_err())
    }

    #[test]
    fn test_empty_email_is_rejected() {
        let email = AccountEmail::try_from("  ".to_string());
        assert!(email.is_err())
    }

    #[test]
    fn test_gender_category_database_round_trip() {
        assert_eq!(
            GenderCategory::from(GenderCategory::Man.as_str().map(String::from)),
            GenderCategory::Man
        );
        assert_eq!(
            GenderCategory::from(GenderCategory::Unknown.as_str().map(String::from)),
            GenderCategory::Unknown
        );
    }

    #[test]
    fn test_unrecognized_provider_is_rejected() {
        assert!(Provider::try_from("KAKAO".to_string()).is_err())
    }
}
