//! Runtime settings resolved from the merged argument map.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::props::Props;

pub const DEFAULT_STANDALONE_FILE: &str = "standalone-7.1.xml";

pub const KEY_STANDALONE_FILE: &str = "standalone-file";
pub const KEY_DATASOURCE: &str = "datasource";
pub const KEY_OUTPUT: &str = "output";
pub const KEY_VERBOSE: &str = "verbose";
pub const KEY_QUIET: &str = "quiet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub standalone_file: PathBuf,
    /// Pool or JNDI name of the datasource to extract; first one when unset.
    pub datasource: Option<String>,
    pub output: OutputFormat,
    pub verbose: u8,
    pub quiet: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            standalone_file: PathBuf::from(DEFAULT_STANDALONE_FILE),
            datasource: None,
            output: OutputFormat::Human,
            verbose: 0,
            quiet: false,
        }
    }
}

impl Settings {
    /// Resolves settings, failing on values that do not convert.
    pub fn from_props(props: &Props) -> Result<Settings> {
        let datasource = Some(props.first_string(KEY_DATASOURCE)).filter(|s| !s.is_empty());
        let output = match props.get(KEY_OUTPUT) {
            Some(_) => props.first_string(KEY_OUTPUT).parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };
        let verbose = props.first_integer(KEY_VERBOSE)?.clamp(0, i32::from(u8::MAX));

        Ok(Settings {
            standalone_file: PathBuf::from(
                props.first_string_or(KEY_STANDALONE_FILE, DEFAULT_STANDALONE_FILE),
            ),
            datasource,
            output,
            verbose: u8::try_from(verbose).unwrap_or(u8::MAX),
            quiet: props.first_boolean(KEY_QUIET)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::props::normalize;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_props(&Props::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.standalone_file, PathBuf::from("standalone-7.1.xml"));
    }

    #[test]
    fn test_settings_from_tokens() {
        let props = normalize([
            "--standalone-file=/opt/wildfly/standalone/configuration/standalone.xml",
            "--datasource=ExampleDS",
            "--output=json",
            "--verbose=2",
            "--quiet=true",
        ]);
        let settings = Settings::from_props(&props).unwrap();
        assert_eq!(
            settings.standalone_file,
            PathBuf::from("/opt/wildfly/standalone/configuration/standalone.xml")
        );
        assert_eq!(settings.datasource.as_deref(), Some("ExampleDS"));
        assert_eq!(settings.output, OutputFormat::Json);
        assert_eq!(settings.verbose, 2);
        assert!(settings.quiet);
    }

    #[test]
    fn test_settings_negative_verbose_clamps_to_zero() {
        let settings = Settings::from_props(&normalize(["--verbose=-3"])).unwrap();
        assert_eq!(settings.verbose, 0);
    }

    #[test]
    fn test_settings_invalid_verbose() {
        let err = Settings::from_props(&normalize(["--verbose=loud"])).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_settings_invalid_output() {
        let err = Settings::from_props(&normalize(["--output=xml"])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
