//! Search parameters for Patient queries

/// Search parameters for `GET [base]/Patient`
///
/// `family` uses the default string matching of the server (case-insensitive
/// "starts with"), the same as an unmodified `family=` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientSearchParams {
    pub family: Option<String>,
    pub given: Option<String>,
    pub birthdate: Option<String>,
    /// Page size hint (`_count`)
    pub count: Option<u32>,
}

impl PatientSearchParams {
    /// Search by family name only.
    pub fn by_family(family: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            ..Self::default()
        }
    }

    /// Render the parameters as a URL query string (without the leading `?`).
    ///
    /// A present but empty family is still sent (`family=`), leaving the
    /// interpretation of an empty value to the server.
    pub fn to_query_string(&self) -> String {
        let mut query_params = Vec::new();

        if let Some(family) = &self.family {
            query_params.push(format!("family={}", urlencoding::encode(family)));
        }
        if let Some(given) = &self.given {
            query_params.push(format!("given={}", urlencoding::encode(given)));
        }
        if let Some(birthdate) = &self.birthdate {
            query_params.push(format!("birthdate={}", urlencoding::encode(birthdate)));
        }
        if let Some(count) = self.count {
            query_params.push(format!("_count={}", count));
        }

        query_params.join("&")
    }
}
