//! Search and scoring configuration

/// Settings for incremental result delivery
pub struct BatchSettings {
    // Flush the pending batch once it holds this many results
    pub max_batch_size: usize,
    // ...or once this much wall-clock time has passed since the previous flush
    pub flush_interval_ms: u64,
}

/// Thresholds applied by the diagnostic tests
pub struct DiagnosticSettings {
    // Any VIF strictly above this fails the collinearity test
    pub vif_threshold: f64,
    // Breusch-Pagan p-values strictly below this reject homoskedasticity
    pub heteroskedasticity_alpha: f64,
    // Used when the request does not carry `pValueThreshold`
    pub default_p_value_threshold: f64,
}

/// Naming conventions shared by the enumerator and the evaluator
pub struct NamingSettings {
    // Key used for the intercept in coefficient / p-value maps
    pub constant_column: &'static str,
    pub model_id_prefix: &'static str,
    // Suffixes disambiguating the constant / no-constant pair under `test`
    pub with_constant_suffix: &'static str,
    pub without_constant_suffix: &'static str,
    // Model id used by single-specification requests that carry none
    pub default_single_model_id: &'static str,
}

/// The Master Search Configuration
pub struct SearchSettings {
    pub batch: BatchSettings,
    pub diagnostics: DiagnosticSettings,
    pub naming: NamingSettings,
}

pub const SEARCH: SearchSettings = SearchSettings {
    batch: BatchSettings {
        max_batch_size: 500,
        flush_interval_ms: 1_500,
    },

    diagnostics: DiagnosticSettings {
        vif_threshold: 10.0,
        heteroskedasticity_alpha: 0.05,
        default_p_value_threshold: 0.05,
    },

    naming: NamingSettings {
        constant_column: "const",
        model_id_prefix: "m_",
        with_constant_suffix: "_c",
        without_constant_suffix: "_nc",
        default_single_model_id: "unknown_model",
    },
};
