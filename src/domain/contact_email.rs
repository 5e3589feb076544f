use std::fmt::Display;

use validator::validate_email;

/// A validated email address an applicant can be reached on.
///
/// On top of the usual email validation the domain part must contain a dot:
/// signups are relayed to a human operator over the public internet, so
/// bare-host addresses like `nova@localhost` are useless here.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        let has_dotted_domain = s
            .rsplit_once('@')
            .map(|(_, domain)| domain.contains('.'))
            .unwrap_or(false);

        if validate_email(&s) && has_dotted_domain {
            Ok(Self(s))
        } else {
            Err(format!("{s} is not a valid contact email."))
        }
    }
}

impl Display for ContactEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
