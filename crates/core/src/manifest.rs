//! TOML description of program elements.
//!
//! ```toml
//! [[element]]
//! kind = "type"
//! name = "Tell"
//! command = ["tell|t <players>"]
//!
//! [[element]]
//! kind = "method"
//! enclosing = "Tell"
//! name = "tell"
//! parameters = ["CommandContext<CommandSender>"]
//! bind = ["<players>"]
//! ```

use crate::element::{Element, Signature, TypeParseError, TypeRef};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read manifest: {0}")]
    Io(#[from] io::Error),
    #[error("manifest is not valid: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("element {element} has a malformed type \"{ty}\": {source}")]
    Type {
        element: String,
        ty: String,
        source: TypeParseError,
    },
    #[error("element {element} is missing `{field}`")]
    Missing {
        element: String,
        field: &'static str,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Module,
    Package,
    Type,
    Method,
    Field,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub kind: EntryKind,
    pub name: String,
    #[serde(default)]
    pub enclosing: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub bind: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub throws: Vec<String>,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "element")]
    pub elements: Vec<Entry>,
}

impl Manifest {
    pub fn from_toml_str(source: &str) -> Result<Manifest, ManifestError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn into_elements(self) -> Result<Vec<Element>, ManifestError> {
        self.elements.into_iter().map(Entry::into_element).collect()
    }
}

impl Entry {
    fn label(&self) -> String {
        match &self.enclosing {
            Some(enclosing) => format!("{}::{}", enclosing, self.name),
            None => self.name.clone(),
        }
    }

    fn parse_type(&self, ty: &str) -> Result<TypeRef, ManifestError> {
        ty.parse().map_err(|source| ManifestError::Type {
            element: self.label(),
            ty: ty.to_string(),
            source,
        })
    }

    fn enclosing(&self) -> Result<String, ManifestError> {
        self.enclosing.clone().ok_or_else(|| ManifestError::Missing {
            element: self.label(),
            field: "enclosing",
        })
    }

    pub fn into_element(self) -> Result<Element, ManifestError> {
        let element = match self.kind {
            EntryKind::Module => Element::module(&self.name),
            EntryKind::Package => Element::package(&self.name),
            EntryKind::Type => Element::ty(&self.name),
            EntryKind::Method => {
                let parameters = self
                    .parameters
                    .iter()
                    .map(|ty| self.parse_type(ty))
                    .collect::<Result<Vec<_>, _>>()?;
                let returns = match &self.returns {
                    Some(ty) => self.parse_type(ty)?,
                    None => TypeRef::void(),
                };
                let signature = self
                    .throws
                    .iter()
                    .try_fold(Signature::new(parameters, returns), |signature, ty| {
                        Ok::<_, ManifestError>(signature.throws(self.parse_type(ty)?))
                    })?;
                Element::method(self.enclosing()?, &self.name, signature)
            }
            EntryKind::Field => {
                let ty = self.ty.as_deref().ok_or_else(|| ManifestError::Missing {
                    element: self.label(),
                    field: "type",
                })?;
                let mut field = Element::field(self.enclosing()?, &self.name, self.parse_type(ty)?);
                if let Some(value) = &self.value {
                    field = field.initializer(value);
                }
                field
            }
        };

        let element = self
            .command
            .into_iter()
            .fold(element, |element, grammar| element.command(grammar));
        Ok(self
            .bind
            .into_iter()
            .fold(element, |element, pattern| element.bind(pattern)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    const TELL: &str = r#"
[[element]]
kind = "type"
name = "Tell"
command = ["tell|t <players>"]

[[element]]
kind = "method"
enclosing = "Tell"
name = "tell"
parameters = ["CommandContext<CommandSender>"]
throws = ["CommandSyntaxException"]
bind = ["<players>"]

[[element]]
kind = "field"
enclosing = "Tell"
name = "players"
type = "ArgumentType<?>"
value = "player"
bind = ["<players>"]
"#;

    #[test]
    fn parse_manifest() {
        let elements = Manifest::from_toml_str(TELL)
            .unwrap()
            .into_elements()
            .unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].commands(), ["tell|t <players>"]);

        let ElementKind::Executable(signature) = elements[1].kind() else {
            panic!("expected a method");
        };
        assert!(signature.returns.is_void());
        assert_eq!(signature.throws.len(), 1);
        assert_eq!(elements[1].path(), "Tell::tell");

        assert!(matches!(
            elements[2].kind(),
            ElementKind::Variable { initializer: Some(value), .. } if value == "player"
        ));
    }

    #[test]
    fn field_without_type() {
        let manifest = Manifest::from_toml_str(
            "[[element]]\nkind = \"field\"\nenclosing = \"Tell\"\nname = \"players\"\n",
        )
        .unwrap();
        assert!(matches!(
            manifest.into_elements(),
            Err(ManifestError::Missing { field: "type", .. })
        ));
    }

    #[test]
    fn malformed_type() {
        let manifest = Manifest::from_toml_str(
            "[[element]]\nkind = \"method\"\nenclosing = \"Tell\"\nname = \"tell\"\nreturns = \"List<\"\n",
        )
        .unwrap();
        let err = manifest.into_elements().unwrap_err();
        assert!(matches!(err, ManifestError::Type { ref ty, .. } if ty == "List<"));
    }

    #[test]
    fn unknown_kind() {
        assert!(matches!(
            Manifest::from_toml_str("[[element]]\nkind = \"enum\"\nname = \"E\"\n"),
            Err(ManifestError::Toml(_))
        ));
    }
}
