//! Wire protocol versions
//!
//! - [`solr4`]: flat `key=value` fragments sent as a query string
//! - [`solr5`]: a single JSON request body

pub(crate) mod local_params;
pub mod solr4;
pub mod solr5;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Request wire format of the target engine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Protocol {
    /// Ordered `key=value` fragments
    #[strum(serialize = "solr4")]
    Solr4,
    /// Nested JSON request body
    #[default]
    #[strum(serialize = "solr5")]
    Solr5,
}
