//! Autocomplete fields.
//!
//! A field is a named option bound to one command that knows three things:
//! how to declare itself inside the command's definition, how to answer the
//! platform's in-flight autocomplete queries, and how to read its submitted
//! value back out of the final command payload. Command handlers compose
//! fields instead of re-implementing option plumbing.

use async_trait::async_trait;
use serde_json::Value;

use paddock_core::{AutocompletePayload, CommandPayload};

use crate::error::HandlerResult;
use crate::handler::OptionDefinition;

/// One suggestion returned to the platform for an autocomplete query.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteChoice {
    /// Label shown to the user.
    pub name: String,
    /// Value submitted if the user picks this choice.
    pub value: Value,
}

impl AutocompleteChoice {
    /// Creates a choice.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named, autocompleted option belonging to one command.
#[async_trait]
pub trait AutocompleteField: Send + Sync {
    /// Name of the command this field belongs to.
    fn command(&self) -> &str;

    /// Option name within that command.
    fn field(&self) -> &str;

    /// Declaration contributed to the owning command's definition.
    fn declaration(&self, description: &str, required: bool) -> OptionDefinition;

    /// Produces the choices for an in-flight autocomplete query.
    async fn suggest(&self, payload: &AutocompletePayload)
    -> HandlerResult<Vec<AutocompleteChoice>>;

    /// Reads this field's submitted value back out of a command payload.
    fn value(&self, payload: &CommandPayload) -> Option<Value> {
        payload.option(self.field()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::OptionKind;
    use paddock_core::CommandOption;
    use serde_json::json;

    /// Field suggesting open races by id, filtered on the typed prefix.
    struct RaceField {
        races: Vec<(i64, &'static str)>,
    }

    #[async_trait]
    impl AutocompleteField for RaceField {
        fn command(&self) -> &str {
            "register-race"
        }

        fn field(&self) -> &str {
            "race"
        }

        fn declaration(&self, description: &str, required: bool) -> OptionDefinition {
            let declaration =
                OptionDefinition::new(self.field(), description, OptionKind::Integer)
                    .autocompleted();
            if required {
                declaration
            } else {
                declaration.optional()
            }
        }

        async fn suggest(
            &self,
            payload: &AutocompletePayload,
        ) -> HandlerResult<Vec<AutocompleteChoice>> {
            Ok(self
                .races
                .iter()
                .filter(|(_, name)| name.starts_with(&payload.partial))
                .map(|(id, name)| AutocompleteChoice::new(*name, *id))
                .collect())
        }
    }

    #[tokio::test]
    async fn fields_declare_suggest_and_read_back() {
        let field = RaceField {
            races: vec![(7, "smw-any%"), (8, "alttp-nmg")],
        };

        let declaration = field.declaration("Corrida", true);
        assert_eq!(declaration.name, "race");
        assert!(declaration.autocomplete);

        let choices = field
            .suggest(&AutocompletePayload {
                command: "register-race".into(),
                field: "race".into(),
                partial: "smw".into(),
                options: vec![],
            })
            .await
            .unwrap();
        assert_eq!(choices, [AutocompleteChoice::new("smw-any%", 7)]);

        let submitted = field.value(&CommandPayload {
            command: "register-race".into(),
            options: vec![CommandOption {
                name: "race".into(),
                value: json!(7),
            }],
        });
        assert_eq!(submitted, Some(json!(7)));
    }
}
