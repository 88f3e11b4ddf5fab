use std::path::Path;

use crate::descriptor::{DescriptorError, RawDescriptor, Result};

pub trait DescriptorFormat: std::fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;
    fn extensions(&self) -> &'static [&'static str];
    fn parse(&self, path: &Path, content: &str) -> Result<RawDescriptor>;
}

pub fn format_for_path(path: &Path) -> Result<Box<dyn DescriptorFormat>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    match extension {
        "toml" => Ok(Box::new(TomlFormat)),
        "json" => Ok(Box::new(JsonFormat)),
        _ => Err(DescriptorError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[derive(Debug)]
pub struct TomlFormat;

impl DescriptorFormat for TomlFormat {
    fn id(&self) -> &'static str {
        "toml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawDescriptor> {
        let value: toml::Value = toml::from_str(content).map_err(|source| DescriptorError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        let project = value
            .get("project")
            .ok_or_else(|| invalid(path, "missing project table"))?
            .as_table()
            .ok_or_else(|| invalid(path, "project is not a table"))?;

        let mut raw = RawDescriptor {
            project: toml_fields(project),
            dependencies: Vec::new(),
        };

        match value.get("dependencies") {
            None => {}
            Some(toml::Value::Array(entries)) => {
                for entry in entries {
                    let table = entry
                        .as_table()
                        .ok_or_else(|| invalid(path, "dependency entry is not a table"))?;
                    raw.dependencies.push(toml_fields(table));
                }
            }
            Some(_) => return Err(invalid(path, "dependencies is not an array")),
        }

        Ok(raw)
    }
}

#[derive(Debug)]
pub struct JsonFormat;

impl DescriptorFormat for JsonFormat {
    fn id(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, path: &Path, content: &str) -> Result<RawDescriptor> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|source| DescriptorError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let project = value
            .get("project")
            .ok_or_else(|| invalid(path, "missing project object"))?
            .as_object()
            .ok_or_else(|| invalid(path, "project is not an object"))?;

        let mut raw = RawDescriptor {
            project: json_fields(project),
            dependencies: Vec::new(),
        };

        match value.get("dependencies") {
            None => {}
            Some(serde_json::Value::Array(entries)) => {
                for entry in entries {
                    let object = entry
                        .as_object()
                        .ok_or_else(|| invalid(path, "dependency entry is not an object"))?;
                    raw.dependencies.push(json_fields(object));
                }
            }
            Some(_) => return Err(invalid(path, "dependencies is not an array")),
        }

        Ok(raw)
    }
}

// Only string-valued fields participate in identity; anything else is
// treated as absent.
fn toml_fields(table: &toml::value::Table) -> Vec<(String, String)> {
    table
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_str()
                .map(|value| (name.clone(), value.to_string()))
        })
        .collect()
}

fn json_fields(object: &serde_json::Map<String, serde_json::Value>) -> Vec<(String, String)> {
    object
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_str()
                .map(|value| (name.clone(), value.to_string()))
        })
        .collect()
}

fn invalid(path: &Path, reason: &str) -> DescriptorError {
    DescriptorError::Invalid {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::descriptor::formats::{format_for_path, DescriptorFormat, TomlFormat};
    use crate::descriptor::DescriptorError;

    #[test]
    fn format_dispatch_follows_the_file_extension() {
        assert_eq!(
            format_for_path(Path::new("a/project.toml"))
                .expect("toml format")
                .id(),
            "toml"
        );
        assert_eq!(
            format_for_path(Path::new("a/project.json"))
                .expect("json format")
                .id(),
            "json"
        );
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let err = format_for_path(Path::new("project.xml")).expect_err("unsupported");
        assert!(matches!(err, DescriptorError::UnsupportedFormat(_)));
        let err = format_for_path(Path::new("project")).expect_err("unsupported");
        assert!(matches!(err, DescriptorError::UnsupportedFormat(_)));
    }

    #[test]
    fn non_string_field_values_are_treated_as_absent() {
        let content = "[project]\nartifact = \"app\"\nversion = 3\n";
        let raw = TomlFormat
            .parse(Path::new("project.toml"), content)
            .expect("parse raw");
        assert_eq!(raw.project, vec![("artifact".to_string(), "app".to_string())]);
    }
}
