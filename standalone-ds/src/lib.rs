//! Extracts a datasource definition from a WildFly/JBoss `standalone.xml`.
//!
//! The pieces are used in this order by the `standalone-ds` binary:
//! [`props::merge_all`] builds the argument map, [`config::Settings`] reads
//! it, [`datasource::extract_datasource`] walks the file and
//! [`output::render`] formats the result.

pub mod config;
pub mod datasource;
pub mod error;
pub mod logging;
pub mod output;
pub mod props;
pub mod xml;

// =====================
// Public API
// =====================

pub use config::Settings;
pub use datasource::{extract_datasource, Datasource, Driver, Extraction, Security};
pub use error::{Error, Result};
pub use output::{render, OutputFormat};
pub use props::{merge_all, normalize, ProcessSnapshot, Props};
pub use xml::{Server, XmlNode};
