//! API configuration

use serde::Deserialize;

use crate::receipt::ClinicInfo;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Clinic name printed on receipts
    pub clinic_name: String,
    /// Clinic address printed on receipts
    pub clinic_address: String,
    /// Clinic phone printed on receipts
    pub clinic_phone: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/clinicbill".to_string(),
            log_level: "info".to_string(),
            clinic_name: "ClinicBill Pro".to_string(),
            clinic_address: "123 Medical Center Drive".to_string(),
            clinic_phone: "(555) 123-4567".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The receipt header block
    pub fn clinic_info(&self) -> ClinicInfo {
        ClinicInfo {
            name: self.clinic_name.clone(),
            address: self.clinic_address.clone(),
            phone: self.clinic_phone.clone(),
        }
    }
}
