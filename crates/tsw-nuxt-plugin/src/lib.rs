pub mod code_tree;
pub mod doc;
pub mod emitters;
pub mod error;
pub mod generator;
pub mod params;
pub mod path_tree;
pub mod type_resolver;

pub use error::PluginError;
pub use generator::{GeneratedSources, NuxtPluginConfig, NuxtPluginGenerator, generate};
