//! Payloads exchanged with the platform.
//!
//! Unknown fields are ignored, and missing or `null` fields take their
//! defaults, so the types survive additions to the remote schema.

mod element;
mod formula;
mod hub;
mod intelligence;
mod job;
mod resource;
mod transformation;
mod user;

pub use element::{
    DefaultTransformation, Element, ElementAuthentication, ElementConfiguration, ElementInstance,
    ElementResource, InstanceUser,
};
pub use formula::{
    Formula, FormulaConfiguration, FormulaInstance, FormulaInstanceExecution, Step, Trigger,
};
pub use hub::Hub;
pub use intelligence::{ApiInfo, Discovery, ElementMetadata, Usage};
pub use job::{Job, JobData};
pub use resource::{CommonResource, Field};
pub use transformation::{AccountElement, Script, Transformation, Transformations};
pub use user::{Role, User};

use serde::{Deserialize, Deserializer};

/// Decode a field, reading `null` as the type's default.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
