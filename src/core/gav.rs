pub const GAV_DELIMITER: &str = "|";

pub const FIELD_GROUP: &str = "group";
pub const FIELD_ARTIFACT: &str = "artifact";
pub const FIELD_VERSION: &str = "version";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Recognized identity fields of a project or dependency node. Keyed
/// strictly by name; only the first non-empty occurrence per name is kept.
#[derive(Debug, Clone, Default)]
pub struct GavFields {
    group: Option<String>,
    artifact: Option<String>,
    version: Option<String>,
}

impl GavFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let slot = match name {
            FIELD_GROUP => &mut self.group,
            FIELD_ARTIFACT => &mut self.artifact,
            FIELD_VERSION => &mut self.version,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    // Absent fields are omitted, not left blank: a node with only an
    // artifact yields an id that is exactly the artifact value.
    pub fn to_id(&self) -> Option<ProjectId> {
        let parts: Vec<&str> = [&self.group, &self.artifact, &self.version]
            .into_iter()
            .filter_map(|slot| slot.as_deref())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(ProjectId::new(parts.join(GAV_DELIMITER)))
        }
    }
}

pub fn project_id_from_fields<'a, I>(fields: I) -> Option<ProjectId>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut gav = GavFields::new();
    for (name, value) in fields {
        gav.record(name, value);
    }
    gav.to_id()
}

#[cfg(test)]
mod tests {
    use crate::core::gav::{project_id_from_fields, GavFields};

    #[test]
    fn full_gav_joins_in_slot_order() {
        let id = project_id_from_fields([("group", "g"), ("artifact", "a"), ("version", "v")])
            .expect("id exists");
        assert_eq!(id.as_str(), "g|a|v");
    }

    #[test]
    fn version_is_optional() {
        let id = project_id_from_fields([("group", "g"), ("artifact", "a")]).expect("id exists");
        assert_eq!(id.as_str(), "g|a");
    }

    #[test]
    fn artifact_alone_is_a_valid_partial_id() {
        let id = project_id_from_fields([("artifact", "a")]).expect("id exists");
        assert_eq!(id.as_str(), "a");
    }

    #[test]
    fn document_order_does_not_matter() {
        let id = project_id_from_fields([("version", "v"), ("artifact", "a"), ("group", "g")])
            .expect("id exists");
        assert_eq!(id.as_str(), "g|a|v");
    }

    #[test]
    fn no_recognized_fields_yields_none() {
        assert!(project_id_from_fields([]).is_none());
        assert!(project_id_from_fields([("scope", "test"), ("type", "jar")]).is_none());
    }

    #[test]
    fn empty_values_are_treated_as_absent() {
        let id = project_id_from_fields([("group", ""), ("artifact", "a"), ("version", "")])
            .expect("id exists");
        assert_eq!(id.as_str(), "a");
    }

    #[test]
    fn first_non_empty_occurrence_per_name_wins() {
        let mut gav = GavFields::new();
        gav.record("artifact", "");
        gav.record("artifact", "first");
        gav.record("artifact", "second");
        gav.record("classifier", "ignored");
        let id = gav.to_id().expect("id exists");
        assert_eq!(id.as_str(), "first");
    }
}
