use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::gav::{project_id_from_fields, ProjectId};

pub mod formats;

pub use formats::{format_for_path, DescriptorFormat, JsonFormat, TomlFormat};

/// Field pairs extracted from a descriptor document: the project node's
/// fields, then one field list per dependency node.
#[derive(Debug, Clone, Default)]
pub struct RawDescriptor {
    pub project: Vec<(String, String)>,
    pub dependencies: Vec<Vec<(String, String)>>,
}

#[derive(Debug, Clone)]
pub struct Descriptor {
    pub project: ProjectId,
    pub dependencies: Vec<ProjectId>,
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("unsupported descriptor format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("failed to parse descriptor at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse descriptor at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("descriptor at {path} is malformed: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("descriptor at {0} has no project identity")]
    MissingProjectIdentity(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;

pub fn parse_descriptor_file(path: &Path) -> Result<Descriptor> {
    let format = format_for_path(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_descriptor(format.as_ref(), path, &content)
}

// A project node with no usable identity fails the whole document; a
// dependency node with none is skipped silently.
pub fn parse_descriptor(
    format: &dyn DescriptorFormat,
    path: &Path,
    content: &str,
) -> Result<Descriptor> {
    let raw = format.parse(path, content)?;

    let project = project_id_from_fields(field_pairs(&raw.project))
        .ok_or_else(|| DescriptorError::MissingProjectIdentity(path.to_path_buf()))?;
    let dependencies = raw
        .dependencies
        .iter()
        .filter_map(|fields| project_id_from_fields(field_pairs(fields)))
        .collect();

    Ok(Descriptor {
        project,
        dependencies,
    })
}

fn field_pairs(fields: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    fields
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::core::gav::ProjectId;
    use crate::descriptor::{parse_descriptor, DescriptorError, JsonFormat, TomlFormat};

    #[test]
    fn toml_descriptor_yields_project_and_dependency_ids() {
        let content = r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0"

[[dependencies]]
group = "com.example"
artifact = "core"
version = "1.0"

[[dependencies]]
artifact = "standalone"
"#;
        let descriptor = parse_descriptor(&TomlFormat, Path::new("project.toml"), content)
            .expect("parse descriptor");
        assert_eq!(descriptor.project.as_str(), "com.example|app|1.0");
        assert_eq!(
            descriptor.dependencies,
            vec![
                ProjectId::new("com.example|core|1.0"),
                ProjectId::new("standalone"),
            ]
        );
    }

    #[test]
    fn missing_dependencies_section_is_valid_and_empty() {
        let content = "[project]\ngroup = \"g\"\nartifact = \"a\"\n";
        let descriptor = parse_descriptor(&TomlFormat, Path::new("project.toml"), content)
            .expect("parse descriptor");
        assert_eq!(descriptor.project.as_str(), "g|a");
        assert!(descriptor.dependencies.is_empty());
    }

    #[test]
    fn dependency_nodes_without_identity_are_skipped() {
        let content = r#"
[project]
artifact = "app"

[[dependencies]]
scope = "test"

[[dependencies]]
artifact = "core"
"#;
        let descriptor = parse_descriptor(&TomlFormat, Path::new("project.toml"), content)
            .expect("parse descriptor");
        assert_eq!(descriptor.dependencies, vec![ProjectId::new("core")]);
    }

    #[test]
    fn project_without_identity_fails_the_document() {
        let content = "[project]\nname = \"not-a-gav-field\"\n";
        let err = parse_descriptor(&TomlFormat, Path::new("project.toml"), content)
            .expect_err("missing identity");
        assert!(matches!(err, DescriptorError::MissingProjectIdentity(_)));
    }

    #[test]
    fn unparseable_toml_is_malformed() {
        let err = parse_descriptor(&TomlFormat, Path::new("project.toml"), "[project")
            .expect_err("parse failure");
        assert!(matches!(err, DescriptorError::Toml { .. }));
    }

    #[test]
    fn missing_project_node_is_malformed() {
        let err = parse_descriptor(&TomlFormat, Path::new("project.toml"), "[settings]\n")
            .expect_err("structural failure");
        assert!(matches!(err, DescriptorError::Invalid { .. }));
    }

    #[test]
    fn json_descriptor_parses_the_same_shape() {
        let content = r#"{
  "project": {"group": "com.example", "artifact": "app", "version": "2.0"},
  "dependencies": [
    {"group": "com.example", "artifact": "core", "version": "2.0"}
  ]
}"#;
        let descriptor = parse_descriptor(&JsonFormat, Path::new("project.json"), content)
            .expect("parse descriptor");
        assert_eq!(descriptor.project.as_str(), "com.example|app|2.0");
        assert_eq!(
            descriptor.dependencies,
            vec![ProjectId::new("com.example|core|2.0")]
        );
    }

    #[test]
    fn json_dependencies_must_be_an_array() {
        let content = r#"{"project": {"artifact": "app"}, "dependencies": {"artifact": "core"}}"#;
        let err = parse_descriptor(&JsonFormat, Path::new("project.json"), content)
            .expect_err("structural failure");
        assert!(matches!(err, DescriptorError::Invalid { .. }));
    }
}
