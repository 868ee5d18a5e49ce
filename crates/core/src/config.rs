use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use toml_edit::{value, DocumentMut};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file: {0}")]
    Io(#[from] io::Error),
    #[error("config is not valid toml: {0}")]
    Syntax(#[from] toml_edit::TomlError),
    #[error("config has an invalid value: {0}")]
    Value(#[from] toml::de::Error),
}

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

macro_rules! gen_config {
    (
        $( $(#[doc = $doc:literal])* $name:ident: $type:ty = $default:expr ),* $(,)?
    ) => {
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        pub struct CompilerConfig {
            $(
                $(#[doc = $doc])*
                pub $name: $type,
            )*
        }

        impl Default for CompilerConfig {
            fn default() -> Self {
                Self {
                    $( $name: $default, )*
                }
            }
        }

        impl CompilerConfig {
            /// Fills every missing key of `doc` with its default.
            fn patch(doc: &mut DocumentMut) {
                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), doc);
                )*
            }
        }
    };
}

gen_config! {
    context_type: String = "CommandContext".to_string(),
    sender_type: String = "CommandSender".to_string(),
    builder_type: String = "SuggestionsBuilder".to_string(),
    future_type: String = "CompletableFuture".to_string(),
    argument_type: String = "ArgumentType".to_string(),
    command_type: String = "Command".to_string(),
    predicate_type: String = "Predicate".to_string(),
    provider_type: String = "SuggestionProvider".to_string(),
    /// The one checked exception bound methods may declare.
    exception_type: String = "CommandSyntaxException".to_string(),
    /// Drop commands whose requirement can never pass while merging.
    prune_unusable: bool = true,
    /// Add aliases to the tree as redirecting literals.
    expand_aliases: bool = false,
}

impl CompilerConfig {
    pub fn from_toml_str(source: &str) -> Result<CompilerConfig, ConfigError> {
        let mut doc = source.parse::<DocumentMut>()?;
        Self::patch(&mut doc);
        Ok(toml::from_str(&doc.to_string())?)
    }

    /// Loads `path`, writing any missing keys back with their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<CompilerConfig, ConfigError> {
        let path = path.as_ref();
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        let mut doc = source.parse::<DocumentMut>()?;
        Self::patch(&mut doc);

        let patched = doc.to_string();
        if source != patched {
            fs::write(path, &patched)?;
        }

        Ok(toml::from_str(&patched)?)
    }
}
