use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tax: TaxConfig,
    pub selection: SelectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 税务参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfig {
    /// 法定增值税率 (危地马拉 IVA 12%)
    pub statutory_rate: f64,
    /// 未提供汇率时的默认 USD -> GTQ 汇率
    pub default_exchange_rate: f64,
    pub min_exchange_rate: f64,
    pub max_exchange_rate: f64,
    pub fields: DteFields,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            statutory_rate: 0.12,
            default_exchange_rate: 7.75,
            min_exchange_rate: 1.0,
            max_exchange_rate: 15.0,
            fields: DteFields::default(),
        }
    }
}

/// SAT 导出表中校验用到的固定列名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DteFields {
    pub total: String,
    pub tax: String,
    pub canceled: String,
    pub document_type: String,
}

impl Default for DteFields {
    fn default() -> Self {
        Self {
            total: "Gran Total (Moneda Original)".to_string(),
            tax: "IVA (monto de este impuesto)".to_string(),
            canceled: "Marca de anulado".to_string(),
            document_type: "Tipo de DTE (nombre)".to_string(),
        }
    }
}

/// 贪心选择参数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// 目标税额的容差比例 (±5%)
    pub tolerance: f64,
    /// 评分差在此范围内视为并列，按税额降序
    pub tie_threshold: f64,
    /// 精确算法允许的最大容量 (分)
    pub max_exact_cents: usize,
    /// 精确算法允许的最大计算量 (有效发票数 x 容量)
    pub max_exact_work: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            tie_threshold: 0.1,
            max_exact_cents: 4_000_000,
            max_exact_work: 50_000_000,
        }
    }
}

impl AppConfig {
    /// 加载配置：内置默认值 -> vat-optimizer.{toml,yaml,json} -> 环境变量 (VAT_SERVER__PORT 等)
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("vat-optimizer").required(false))
            .add_source(
                config::Environment::with_prefix("VAT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tax.statutory_rate, 0.12);
        assert_eq!(config.tax.default_exchange_rate, 7.75);
        assert_eq!(config.selection.tolerance, 0.05);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.tax.fields.document_type, "Tipo de DTE (nombre)");
    }

    #[test]
    fn test_load_without_overrides_keeps_defaults() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.tax.max_exchange_rate, 15.0);
        assert_eq!(config.tax.fields.tax, "IVA (monto de este impuesto)");
    }

    #[test]
    fn test_env_overrides_use_single_underscore_after_prefix() {
        std::env::set_var("VAT_SERVER__PORT", "9191");
        std::env::set_var("VAT_SELECTION__MAX_EXACT_WORK", "1000");
        let config = AppConfig::load();
        std::env::remove_var("VAT_SERVER__PORT");
        std::env::remove_var("VAT_SELECTION__MAX_EXACT_WORK");

        let config = config.unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.selection.max_exact_work, 1000);
        assert_eq!(config.selection.max_exact_cents, 4_000_000);
    }
}
