use std::str::FromStr;
use thiserror::Error as ThisError;

const LANG: &str = "lang";
const FORMAT: &str = "format";
const MODULE: &str = "module";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("`format` must be `true` or `false`, got `{0}`")]
    InvalidFormat(String),

    #[error("malformed parameter `{0}`, expected `key=value`")]
    MalformedParameter(String),

    #[error("`lang` parameter is required")]
    MissingLang,

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("unknown target language `{0}`")]
    UnknownTargetLanguage(String),
}

///
/// Config
/// generator options parsed from the plugin parameter string,
/// e.g. `lang=java,format=true,module=acme/`
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub lang: String,
    pub format: bool,
    pub module: Option<String>,
}

impl Config {
    #[must_use]
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: &str) -> Self {
        self.module = Some(module.to_string());
        self
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lang = None;
        let mut config = Self::default();

        for param in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedParameter(param.to_string()))?;
            let value = value.trim();

            match key.trim() {
                LANG => lang = Some(value.to_string()),
                FORMAT => {
                    config.format = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidFormat(value.to_string()))?;
                }
                MODULE => config.module = Some(value.to_string()).filter(|m| !m.is_empty()),
                other => return Err(ConfigError::UnknownParameter(other.to_string())),
            }
        }

        config.lang = lang
            .filter(|lang| !lang.is_empty())
            .ok_or(ConfigError::MissingLang)?;

        Ok(config)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_every_parameter() {
        let config: Config = "lang=java, format=true,module=acme/".parse().unwrap();

        assert_eq!(
            config,
            Config::new("java").with_format(true).with_module("acme/")
        );
    }

    #[test]
    fn format_defaults_to_off() {
        let config: Config = "lang=rust".parse().unwrap();

        assert!(!config.format);
        assert_eq!(config.module, None);
    }

    #[test]
    fn lang_is_required() {
        assert!(matches!(
            "format=true".parse::<Config>(),
            Err(ConfigError::MissingLang)
        ));
        assert!(matches!(
            "lang=".parse::<Config>(),
            Err(ConfigError::MissingLang)
        ));
    }

    #[test]
    fn bad_parameters_are_rejected() {
        assert!(matches!(
            "lang=java,format=yes".parse::<Config>(),
            Err(ConfigError::InvalidFormat(v)) if v == "yes"
        ));
        assert!(matches!(
            "lang=java,verbose".parse::<Config>(),
            Err(ConfigError::MalformedParameter(_))
        ));
        assert!(matches!(
            "lang=java,paths=source_relative".parse::<Config>(),
            Err(ConfigError::UnknownParameter(k)) if k == "paths"
        ));
    }

    proptest! {
        #[test]
        fn parameter_order_does_not_matter(
            lang in "[a-z]{1,8}",
            format in any::<bool>(),
            module in proptest::option::of("[a-z]{1,6}/"),
        ) {
            let mut params = vec![format!("lang={lang}"), format!("format={format}")];
            if let Some(module) = &module {
                params.push(format!("module={module}"));
            }
            let expected = Config { lang, format, module };

            prop_assert_eq!(params.join(",").parse::<Config>().unwrap(), expected.clone());
            params.reverse();
            prop_assert_eq!(params.join(",").parse::<Config>().unwrap(), expected);
        }
    }
}
