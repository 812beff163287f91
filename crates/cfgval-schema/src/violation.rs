//! # Violations
//!
//! One [`Violation`] per problem found in a configuration section. These
//! are data, not failures: validation always completes and hands the
//! caller a [`ValidationResult`]. Only `validated_config` turns them into
//! a raised [`crate::ValidationError`].

use std::fmt;

use cfgval_core::ValueKind;
use serde_json::Number;
use thiserror::Error;

/// A single validation finding. `Display` renders the user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    /// A required top-level section is absent.
    #[error("Configuration section '{section}' is missing")]
    MissingSection {
        /// Section (schema node) name.
        section: String,
    },

    /// A required property is absent.
    #[error("Required property '{path}' is missing")]
    MissingProperty {
        /// Dotted path to the property.
        path: String,
    },

    /// The value has the wrong kind.
    #[error("Property '{path}' must be {}, got {actual}", .expected.with_article())]
    TypeMismatch {
        /// Dotted path to the property.
        path: String,
        /// Kind the schema asks for.
        expected: ValueKind,
        /// Kind actually found.
        actual: ValueKind,
    },

    /// A string is shorter than `minLength`.
    #[error("Property '{path}' must be at least {min} characters long")]
    TooShort {
        /// Dotted path to the property.
        path: String,
        /// Declared minimum length.
        min: usize,
    },

    /// A string is longer than `maxLength`.
    #[error("Property '{path}' must be at most {max} characters long")]
    TooLong {
        /// Dotted path to the property.
        path: String,
        /// Declared maximum length.
        max: usize,
    },

    /// A string does not match the declared pattern.
    #[error("Property '{path}' does not match pattern {pattern}")]
    PatternMismatch {
        /// Dotted path to the property.
        path: String,
        /// Declared pattern source.
        pattern: String,
    },

    /// The declared pattern is not a valid regular expression.
    #[error("Property '{path}' declares an invalid pattern {pattern}: {reason}")]
    InvalidPattern {
        /// Dotted path to the property.
        path: String,
        /// Declared pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A number is below `min`.
    #[error("Property '{path}' must be >= {min}, got {actual}")]
    BelowMinimum {
        /// Dotted path to the property.
        path: String,
        /// Declared inclusive minimum.
        min: f64,
        /// Value found.
        actual: Number,
    },

    /// A number is above `max`.
    #[error("Property '{path}' must be <= {max}, got {actual}")]
    AboveMaximum {
        /// Dotted path to the property.
        path: String,
        /// Declared inclusive maximum.
        max: f64,
        /// Value found.
        actual: Number,
    },

    /// A value is not one of the enum's literals.
    #[error("Property '{path}' must be one of [{}], got {actual}", .allowed.join(", "))]
    NotInEnum {
        /// Dotted path to the property.
        path: String,
        /// Allowed literals in declaration order.
        allowed: Vec<String>,
        /// Rendering of the value found.
        actual: String,
    },

    /// An enum's declared default is not one of its literals.
    #[error("Default value '{value}' for '{path}' is not in enum [{}]", .allowed.join(", "))]
    DefaultNotInEnum {
        /// Dotted path to the property.
        path: String,
        /// The offending default.
        value: String,
        /// Allowed literals in declaration order.
        allowed: Vec<String>,
    },

    /// An enum's documentation example is not one of its literals.
    #[error("Example value '{value}' for '{path}' is not in enum [{}]", .allowed.join(", "))]
    ExampleNotInEnum {
        /// Dotted path to the property.
        path: String,
        /// The offending example.
        value: String,
        /// Allowed literals in declaration order.
        allowed: Vec<String>,
    },
}

impl Violation {
    /// Dotted path (or section name) the violation refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingSection { section } => section,
            Self::MissingProperty { path }
            | Self::TypeMismatch { path, .. }
            | Self::TooShort { path, .. }
            | Self::TooLong { path, .. }
            | Self::PatternMismatch { path, .. }
            | Self::InvalidPattern { path, .. }
            | Self::BelowMinimum { path, .. }
            | Self::AboveMaximum { path, .. }
            | Self::NotInEnum { path, .. }
            | Self::DefaultNotInEnum { path, .. }
            | Self::ExampleNotInEnum { path, .. } => path,
        }
    }

    /// Whether the violation is a schema-authoring mistake rather than a
    /// problem with the supplied configuration.
    pub fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. }
                | Self::DefaultNotInEnum { .. }
                | Self::ExampleNotInEnum { .. }
        )
    }
}

/// Outcome of validating one or more configuration sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    errors: Vec<Violation>,
}

impl ValidationResult {
    /// Wrap a list of violations.
    pub fn from_violations(errors: Vec<Violation>) -> Self {
        Self { errors }
    }

    /// True when no violation was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations in discovery order.
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    /// Rendered messages in discovery order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Append every violation of `other`.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let v = Violation::TypeMismatch {
            path: "app.port".to_string(),
            expected: ValueKind::Number,
            actual: ValueKind::String,
        };
        assert_eq!(v.to_string(), "Property 'app.port' must be a number, got string");
        assert_eq!(v.path(), "app.port");
    }

    #[test]
    fn test_range_message_renders_whole_bounds_without_fraction() {
        let v = Violation::AboveMaximum {
            path: "database.port".to_string(),
            max: 65535.0,
            actual: Number::from(70000),
        };
        assert_eq!(v.to_string(), "Property 'database.port' must be <= 65535, got 70000");
    }

    #[test]
    fn test_enum_message_lists_allowed_in_order() {
        let v = Violation::NotInEnum {
            path: "database.ssl".to_string(),
            allowed: vec!["disable".to_string(), "require".to_string()],
            actual: "off".to_string(),
        };
        assert_eq!(
            v.to_string(),
            "Property 'database.ssl' must be one of [disable, require], got off"
        );
        assert!(!v.is_authoring_error());
    }

    #[test]
    fn test_result_display_joins_messages() {
        let mut result = ValidationResult::from_violations(vec![Violation::MissingSection {
            section: "redis".to_string(),
        }]);
        result.merge(ValidationResult::from_violations(vec![Violation::MissingProperty {
            path: "app.port".to_string(),
        }]));
        assert!(!result.is_valid());
        assert_eq!(
            result.to_string(),
            "Configuration section 'redis' is missing, Required property 'app.port' is missing"
        );
        assert_eq!(result.messages().len(), 2);
    }
}
