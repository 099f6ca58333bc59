//! The registry of known templates and the variables they require.

use crate::domain::mail::locales::TemplateVariables;

/// A named template and the variables it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    /// The template name, matching its file under `templates/`.
    pub name: &'static str,
    /// Variables the template references; all must be supplied.
    pub required_variables: &'static [&'static str],
}

impl TemplateInfo {
    /// Names of required variables absent from `variables`.
    pub fn missing_variables(&self, variables: &TemplateVariables) -> Vec<&'static str> {
        self.required_variables
            .iter()
            .copied()
            .filter(|name| !variables.contains_key(*name))
            .collect()
    }
}

static TEMPLATES: [TemplateInfo; 7] = [
    TemplateInfo {
        name: "welcome",
        required_variables: &["name", "user_id", "password_link"],
    },
    TemplateInfo {
        name: "otp",
        required_variables: &["name", "otp"],
    },
    TemplateInfo {
        name: "reminder",
        required_variables: &["name", "event", "event_date", "reminder_link"],
    },
    TemplateInfo {
        name: "promotion",
        required_variables: &["name", "discount_code", "expiry_date", "promotion_link"],
    },
    TemplateInfo {
        name: "password-reset",
        required_variables: &["name", "reset_link"],
    },
    TemplateInfo {
        name: "account-verification",
        required_variables: &["name", "verification_link"],
    },
    TemplateInfo {
        name: "subscription-update",
        required_variables: &["name", "subscription_status", "update_link"],
    },
];

/// Lookup over the templates shipped in the content directory.
///
/// The send pipeline itself never consults the registry; any template the
/// loader can resolve is sendable. The registry backs upfront variable
/// checks for callers that want them.
#[derive(Debug)]
pub struct TemplateCatalog;

impl TemplateCatalog {
    /// All registered template names, in registry order.
    pub fn names() -> Vec<&'static str> {
        TEMPLATES.iter().map(|info| info.name).collect()
    }

    /// Metadata for `name`, if registered.
    pub fn info(name: &str) -> Option<&'static TemplateInfo> {
        TEMPLATES.iter().find(|info| info.name == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_info_finds_registered_template() {
        let info = TemplateCatalog::info("otp");

        assert_eq!(
            info,
            Some(&TemplateInfo {
                name: "otp",
                required_variables: &["name", "otp"],
            })
        );
    }

    #[test]
    fn test_info_unknown_template_is_none() {
        assert_eq!(TemplateCatalog::info("newsletter"), None);
    }

    #[test]
    fn test_missing_variables_reports_only_absent_names() {
        let info = TemplateCatalog::info("welcome").unwrap();

        let mut variables = TemplateVariables::new();
        variables.insert("name".to_string(), json!("Dan"));

        assert_eq!(
            info.missing_variables(&variables),
            vec!["user_id", "password_link"]
        );
    }

    #[test]
    fn test_every_template_requires_a_name() {
        for name in TemplateCatalog::names() {
            let info = TemplateCatalog::info(name).unwrap();

            assert!(info.required_variables.contains(&"name"));
        }
    }
}
