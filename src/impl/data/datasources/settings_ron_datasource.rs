use std::fs;

use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    data::models::settings_model::LedgerSettingsModel,
    entities::LedgerSettings,
    errors::{InvalidPageSize, InvalidRon, ReadError},
};

pub(crate) trait SettingsRonDatasource {
    fn from_string(&self, s: &str) -> Result<LedgerSettings, ServerError>;

    fn from_file<P>(&self, path: P) -> Result<LedgerSettings, ServerError>
    where
        P: AsRef<std::path::Path>;
}

pub(crate) struct SettingsRonDatasourceImpl;

impl SettingsRonDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl SettingsRonDatasource for SettingsRonDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<LedgerSettings, ServerError> {
        let model: LedgerSettingsModel = if s.trim().is_empty() {
            LedgerSettingsModel::default()
        } else {
            from_str(s).map_err(|e| InvalidRon::with_debug("LedgerSettings", &e))?
        };
        let settings: LedgerSettings = model.into();
        if settings.page_size == 0 {
            return Err(InvalidPageSize::new(settings.page_size));
        }
        Ok(settings)
    }

    fn from_file<P>(&self, path: P) -> Result<LedgerSettings, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write as _, time::Duration};

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = SettingsRonDatasourceImpl::new()
            .from_string("(page_size: 50)")
            .unwrap();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.search_debounce, Duration::from_millis(400));

        let empty = SettingsRonDatasourceImpl::new().from_string("").unwrap();
        assert_eq!(empty, LedgerSettings::default());
    }

    #[test]
    fn rejects_zero_page_size_and_bad_ron() {
        let ds = SettingsRonDatasourceImpl::new();
        assert!(ds.from_string("(page_size: 0)").is_err());
        assert!(ds.from_string("(page_size: \"many\")").is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(page_size: 10, search_debounce_ms: 250)").unwrap();
        let settings = SettingsRonDatasourceImpl::new()
            .from_file(file.path())
            .unwrap();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.search_debounce, Duration::from_millis(250));

        assert!(SettingsRonDatasourceImpl::new()
            .from_file(file.path().with_extension("missing"))
            .is_err());
    }
}
