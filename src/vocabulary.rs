use std::collections::HashMap;

// ============================================================================
// Status Vocabulary - Injected Type-Code Mapping
// ============================================================================
//
// The license-status vocabulary (integer event-type code -> status name,
// plus the code that marks a registration) is owned by the status service,
// not by this crate. The store receives it at construction so it can be
// swapped out in tests.
//
// ============================================================================

/// Lookup table from integer event-type codes to status names.
#[derive(Clone, Debug)]
pub struct StatusVocabulary {
    names: HashMap<i64, String>,
    registered: i64,
}

impl StatusVocabulary {
    /// Build a vocabulary from `(code, name)` pairs and the code that marks
    /// a device registration.
    pub fn new<I, S>(names: I, registered: i64) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(|(code, name)| (code, name.into())).collect(),
            registered,
        }
    }

    /// Status name for a type code, or `None` for codes outside the table.
    pub fn name(&self, code: i64) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// The type code that marks a device-registration event.
    pub fn registered_code(&self) -> i64 {
        self.registered
    }
}

impl Default for StatusVocabulary {
    /// The standard license-status event vocabulary.
    fn default() -> Self {
        Self::new(
            [(1, "register"), (2, "renew"), (3, "return"), (4, "revoke")],
            1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_maps_known_codes() {
        let vocabulary = StatusVocabulary::default();

        assert_eq!(vocabulary.name(1), Some("register"));
        assert_eq!(vocabulary.name(2), Some("renew"));
        assert_eq!(vocabulary.name(3), Some("return"));
        assert_eq!(vocabulary.name(4), Some("revoke"));
        assert_eq!(vocabulary.registered_code(), 1);
    }

    #[test]
    fn unknown_code_has_no_name() {
        let vocabulary = StatusVocabulary::default();

        assert_eq!(vocabulary.name(99), None);
    }

    #[test]
    fn custom_vocabulary_overrides_the_table() {
        let vocabulary = StatusVocabulary::new([(10, "activated"), (20, "retired")], 10);

        assert_eq!(vocabulary.name(10), Some("activated"));
        assert_eq!(vocabulary.name(1), None);
        assert_eq!(vocabulary.registered_code(), 10);
    }
}
