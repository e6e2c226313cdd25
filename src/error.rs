use thiserror::Error;

/// 边界层错误 (单元格级别的脏数据不会走到这里)
#[derive(Error, Debug)]
pub enum TaxError {
    #[error("{0} ledger is empty or contains no valid data")]
    EmptyLedger(&'static str),
    #[error("Exchange rate must be greater than 0, got {0}")]
    InvalidExchangeRate(f64),
    #[error("Exchange rate must be between {min} and {max}, got {rate}")]
    ExchangeRateOutOfRange { rate: f64, min: f64, max: f64 },
    #[error("Report export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("Report export failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Computation task failed: {0}")]
    Task(String),
}

impl TaxError {
    /// 是否为请求参数问题 (HTTP 400)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TaxError::EmptyLedger(_)
                | TaxError::InvalidExchangeRate(_)
                | TaxError::ExchangeRateOutOfRange { .. }
        )
    }
}
