//! Client side of the blueprint catalogue.
//!
//! [`BlueprintApi`] is the seam: [`HttpBlueprintClient`] talks to the real
//! service, [`MemoryBlueprintApi`] keeps everything in process. The
//! [`SessionResolver`] sits on top of either and guarantees every live session
//! ends up with a blueprint.

pub mod api;
pub mod http;
pub mod memory;
pub mod resolver;

pub use api::{BlueprintApi, ClientError, ClientResult};
pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpBlueprintClient};
pub use memory::{CallCounts, MemoryBlueprintApi};
pub use resolver::{SessionResolver, default_blueprint_name};
