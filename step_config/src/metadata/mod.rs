//! Declarative step and parameter metadata.
//!
//! A [`StepMetadata`] is an immutable, order-preserving table of
//! [`ParameterDescriptor`]s. Declaration order matters: it decides which alias
//! and which resource reference wins when several match. Construction
//! validates the table up front (unique names, well-formed vault templates,
//! defaults matching their types and no placeholder cycles) so that
//! resolution never meets an inconsistent declaration.

mod descriptor;
mod reference;
mod step;
mod template;
#[cfg(feature = "yaml")]
mod yaml;

pub use descriptor::{Alias, ParameterDescriptor};
pub use reference::{ReferenceKind, ResourceReference};
pub use step::{StepMetadata, StepMetadataBuilder};
pub use template::{PathTemplate, TemplateError};
