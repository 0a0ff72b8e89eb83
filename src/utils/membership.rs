//! "Created by a team member" checks.

use crate::error::ValidationError;
use crate::models::Person;

/// The people of a team, used to tell their contributions apart from others'.
///
/// # Example
///
/// ```rust
/// use kanban_report::models::Person;
/// use kanban_report::utils::TeamMembership;
///
/// let john = Person {
///     name: Some("John Doe".to_string()),
///     email: Some("john.doe@example.com".to_string()),
/// };
/// let team = TeamMembership::new(vec![john.clone()]).unwrap();
/// assert!(team.was_created_by(Some(&john)).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TeamMembership {
    members: Vec<Person>,
}

impl TeamMembership {
    /// Fails unless at least one member has both a name and an email.
    pub fn new(members: Vec<Person>) -> Result<Self, ValidationError> {
        if !members.iter().any(Person::is_complete) {
            return Err(ValidationError::InvalidValue {
                name: "members".to_string(),
                expected: "an array of persons".to_string(),
            });
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Person] {
        &self.members
    }

    /// Whether a member has the same name and email as the creator.
    ///
    /// Fails when the creator is unknown or lacks a name or an email.
    pub fn was_created_by(&self, created_by: Option<&Person>) -> Result<bool, ValidationError> {
        let creator = created_by.ok_or_else(|| ValidationError::PropertyNotDefined {
            property: "createdBy".to_string(),
        })?;
        if !creator.is_complete() {
            return Err(ValidationError::InvalidValue {
                name: "createdBy".to_string(),
                expected: "a person object".to_string(),
            });
        }
        Ok(self
            .members
            .iter()
            .any(|m| m.email == creator.email && m.name == creator.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, email: &str) -> Person {
        Person {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        }
    }

    #[test]
    fn test_requires_at_least_one_person() {
        let error = TeamMembership::new(Vec::new()).unwrap_err();
        assert_eq!(error.to_string(), r#""members" is not an array of persons"#);

        let nameless = Person {
            name: None,
            email: Some("ghost@example.com".to_string()),
        };
        assert!(TeamMembership::new(vec![nameless.clone()]).is_err());
        assert!(TeamMembership::new(vec![nameless, person("Jane Roe", "jane@example.com")]).is_ok());
    }

    /// # Creator Matching
    ///
    /// ## Test Scenario
    /// - A team of two members
    /// - Creators that match, differ by email, or are not people
    ///
    /// ## Expected Outcome
    /// - Only an exact name and email match counts
    /// - Missing or incomplete creators are errors
    #[test]
    fn test_was_created_by() {
        let team = TeamMembership::new(vec![
            person("John Doe", "john.doe@example.com"),
            person("Jane Roe", "jane.roe@example.com"),
        ])
        .unwrap();

        assert!(team.was_created_by(Some(&person("Jane Roe", "jane.roe@example.com"))).unwrap());
        assert!(!team.was_created_by(Some(&person("Jane Roe", "jane@elsewhere.com"))).unwrap());
        assert!(!team.was_created_by(Some(&person("Max Moe", "max@example.com"))).unwrap());

        assert_eq!(
            team.was_created_by(None).unwrap_err().to_string(),
            r#"The "createdBy" property is not defined."#
        );
        let anonymous = Person {
            name: Some("Build Service".to_string()),
            email: None,
        };
        assert_eq!(
            team.was_created_by(Some(&anonymous)).unwrap_err().to_string(),
            r#""createdBy" is not a person object"#
        );
    }
}
