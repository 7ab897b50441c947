//! Datasource extraction from a parsed `standalone.xml`.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::xml::{text_of, Server, XmlNode};

/// Outcome of an extraction.
///
/// Serializes to `{"datasource": {...}}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extraction {
    Datasource(Datasource),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Datasource {
    pub jndi_name: String,
    pub pool_name: String,
    pub enabled: String,
    pub use_java_context: String,
    pub security: Security,
    pub driver: Driver,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Security {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Driver {
    pub name: String,
    pub module: String,
    pub xa_datasource_class: String,
}

impl Extraction {
    fn failed(message: String) -> Self {
        tracing::error!("{}", message);
        Extraction::Error(message)
    }

    pub fn datasource(&self) -> Option<&Datasource> {
        match self {
            Extraction::Datasource(ds) => Some(ds),
            Extraction::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Extraction::Error(message) => Some(message),
            Extraction::Datasource(_) => None,
        }
    }
}

/// Extracts one datasource from the `standalone.xml` at `path`.
///
/// `selector`, when given, picks the datasource whose `pool-name` or
/// `jndi-name` equals it; otherwise the first datasource is used.
///
/// Missing nodes produce [`Extraction::Error`]. Unreadable files and
/// malformed XML are returned as `Err`.
pub fn extract_datasource(path: &Path, selector: Option<&str>) -> Result<Extraction> {
    if !path.is_file() {
        return Ok(Extraction::failed(format!(
            "standalone.xml file '{}' not found",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), "parsing server configuration");
    let server = Server::load(path)?;
    Ok(extract_from_server(&server, selector))
}

/// Runs the lookup checkpoints against an already parsed server.
pub fn extract_from_server(server: &Server, selector: Option<&str>) -> Extraction {
    let Some(subsystem) = server.subsystem("datasources") else {
        return Extraction::failed("datasources subsystem not found in profile".to_string());
    };

    let Some(datasources) = subsystem
        .get("datasources")
        .filter(|n| n.as_element().is_some())
    else {
        return Extraction::failed("datasources not found".to_string());
    };

    let Some(candidates) = datasources.get("datasource") else {
        return Extraction::failed("datasource not found".to_string());
    };

    let datasource = match selector {
        Some(name) => {
            let found = candidates.items().iter().find(|ds| {
                text_of(ds, "pool-name") == name || text_of(ds, "jndi-name") == name
            });
            match found {
                Some(ds) => ds,
                None => return Extraction::failed(format!("datasource '{}' not found", name)),
            }
        }
        None => candidates.first(),
    };

    let security = datasource.get("security");
    let driver = datasources
        .get("drivers")
        .and_then(|drivers| drivers.get("driver"))
        .map(|drivers| select_driver(drivers, &text_of(datasource, "driver")));

    tracing::debug!(
        pool_name = %text_of(datasource, "pool-name"),
        "datasource located"
    );

    Extraction::Datasource(Datasource {
        jndi_name: text_of(datasource, "jndi-name"),
        pool_name: text_of(datasource, "pool-name"),
        enabled: text_of(datasource, "enabled"),
        use_java_context: text_of(datasource, "use-java-context"),
        security: security.map_or_else(Security::default, |s| Security {
            user_name: text_of(s, "user-name"),
            password: text_of(s, "password"),
        }),
        driver: driver.map_or_else(Driver::default, |d| Driver {
            name: text_of(d, "name"),
            module: text_of(d, "module"),
            xa_datasource_class: text_of(d, "xa-datasource-class"),
        }),
    })
}

// The driver named by the datasource's <driver> reference, else the first one.
fn select_driver<'a>(drivers: &'a XmlNode, reference: &str) -> &'a XmlNode {
    drivers
        .items()
        .iter()
        .find(|d| !reference.is_empty() && text_of(d, "name") == reference)
        .unwrap_or_else(|| drivers.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(profile: &str) -> Server {
        Server::parse(&format!(
            r#"<server xmlns="urn:jboss:domain:1.7"><profile>{}</profile></server>"#,
            profile
        ))
        .unwrap()
    }

    const TWO_DATASOURCES: &str = r#"
        <subsystem xmlns="urn:jboss:domain:datasources:1.2">
          <datasources>
            <datasource jndi-name="java:jboss/datasources/ExampleDS" pool-name="ExampleDS" enabled="true" use-java-context="true">
              <driver>h2</driver>
              <security><user-name>sa</user-name><password>sa</password></security>
            </datasource>
            <datasource jndi-name="java:jboss/datasources/AppDS" pool-name="AppDS" enabled="false">
              <driver>postgresql</driver>
              <security><user-name>app</user-name><password>s3cret</password></security>
            </datasource>
            <drivers>
              <driver name="h2" module="com.h2database.h2">
                <xa-datasource-class>org.h2.jdbcx.JdbcDataSource</xa-datasource-class>
              </driver>
              <driver name="postgresql" module="org.postgresql">
                <xa-datasource-class>org.postgresql.xa.PGXADataSource</xa-datasource-class>
              </driver>
            </drivers>
          </datasources>
        </subsystem>"#;

    // ==================== checkpoint tests ====================

    #[test]
    fn test_no_datasources_subsystem() {
        let s = server(
            r#"<subsystem xmlns="urn:jboss:domain:naming:1.4"><remote-naming/></subsystem>"#,
        );
        assert_eq!(
            extract_from_server(&s, None),
            Extraction::Error("datasources subsystem not found in profile".into())
        );
    }

    #[test]
    fn test_empty_profile() {
        assert_eq!(
            extract_from_server(&Server::default(), None).error(),
            Some("datasources subsystem not found in profile")
        );
    }

    #[test]
    fn test_empty_datasources_element() {
        let s = server("<subsystem><datasources/></subsystem>");
        assert_eq!(
            extract_from_server(&s, None),
            Extraction::Error("datasources not found".into())
        );
    }

    #[test]
    fn test_no_datasource_element() {
        let s = server(
            r#"<subsystem><datasources><drivers><driver name="h2"/></drivers></datasources></subsystem>"#,
        );
        assert_eq!(
            extract_from_server(&s, None),
            Extraction::Error("datasource not found".into())
        );
    }

    // ==================== navigation tests ====================

    #[test]
    fn test_missing_security_and_drivers_default_to_empty() {
        let s = server(
            r#"<subsystem><datasources><datasource pool-name="P"/></datasources></subsystem>"#,
        );
        let ds = extract_from_server(&s, None).datasource().cloned().unwrap();
        assert_eq!(ds.pool_name, "P");
        assert_eq!(ds.jndi_name, "");
        assert_eq!(ds.security, Security::default());
        assert_eq!(ds.driver, Driver::default());
    }

    #[test]
    fn test_first_datasource_without_selector() {
        let ds = extract_from_server(&server(TWO_DATASOURCES), None)
            .datasource()
            .cloned()
            .unwrap();
        assert_eq!(ds.pool_name, "ExampleDS");
        assert_eq!(ds.security.user_name, "sa");
        assert_eq!(ds.driver.name, "h2");
        assert_eq!(ds.driver.xa_datasource_class, "org.h2.jdbcx.JdbcDataSource");
    }

    #[test]
    fn test_selector_by_pool_name_matches_driver() {
        let ds = extract_from_server(&server(TWO_DATASOURCES), Some("AppDS"))
            .datasource()
            .cloned()
            .unwrap();
        assert_eq!(ds.jndi_name, "java:jboss/datasources/AppDS");
        assert_eq!(ds.enabled, "false");
        assert_eq!(ds.use_java_context, "");
        assert_eq!(ds.security.password, "s3cret");
        assert_eq!(ds.driver.name, "postgresql");
        assert_eq!(ds.driver.module, "org.postgresql");
    }

    #[test]
    fn test_selector_by_jndi_name() {
        let ds = extract_from_server(
            &server(TWO_DATASOURCES),
            Some("java:jboss/datasources/ExampleDS"),
        );
        assert_eq!(ds.datasource().unwrap().pool_name, "ExampleDS");
    }

    #[test]
    fn test_unknown_selector() {
        assert_eq!(
            extract_from_server(&server(TWO_DATASOURCES), Some("MissingDS")),
            Extraction::Error("datasource 'MissingDS' not found".into())
        );
    }

    #[test]
    fn test_unreferenced_driver_falls_back_to_first() {
        let s = server(
            r#"<subsystem><datasources>
                 <datasource pool-name="P"><driver>oracle</driver></datasource>
                 <drivers><driver name="h2"/><driver name="pg"/></drivers>
               </datasources></subsystem>"#,
        );
        let ds = extract_from_server(&s, None).datasource().cloned().unwrap();
        assert_eq!(ds.driver.name, "h2");
    }

    // ==================== serialization tests ====================

    #[test]
    fn test_error_serializes_as_single_key_map() {
        let value = serde_json::to_value(Extraction::Error("datasource not found".into())).unwrap();
        assert_eq!(value, serde_json::json!({"error": "datasource not found"}));
    }

    #[test]
    fn test_datasource_serializes_with_kebab_keys() {
        let extraction = extract_from_server(&server(TWO_DATASOURCES), None);
        let value = serde_json::to_value(extraction).unwrap();
        assert_eq!(value["datasource"]["jndi-name"], "java:jboss/datasources/ExampleDS");
        assert_eq!(value["datasource"]["use-java-context"], "true");
        assert_eq!(value["datasource"]["security"]["user-name"], "sa");
        assert_eq!(
            value["datasource"]["driver"]["xa-datasource-class"],
            "org.h2.jdbcx.JdbcDataSource"
        );
    }
}
