use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::format::CurrencyFormat;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SALES_PANEL_CONFIG";
/// Environment variable naming the dataset to open on startup.
pub const FILE_ENV: &str = "SALES_PANEL_FILE";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnMapping,
    pub currency: CurrencyFormat,
    /// Dataset opened on startup.
    pub default_file: Option<PathBuf>,
}

/// Where each field lives in the source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Worksheet name (spreadsheet formats only).
    pub sheet: String,
    pub date: String,
    pub region: String,
    pub store: String,
    pub amount: String,
    pub quantity: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            sheet: "Vendas_dos_Mercados_2024".to_string(),
            date: "Data da Venda".to_string(),
            region: "UF da Compra".to_string(),
            store: "Nome da Loja".to_string(),
            amount: "Valor da Venda".to_string(),
            quantity: "Quantidade".to_string(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then `SALES_PANEL_CONFIG`, then `SALES_PANEL_FILE`, then
    /// the first command-line argument.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(file) = std::env::var_os(FILE_ENV) {
            config.default_file = Some(PathBuf::from(file));
        }
        if let Some(arg) = std::env::args_os().nth(1) {
            config.default_file = Some(PathBuf::from(arg));
        }

        Ok(config)
    }
}
