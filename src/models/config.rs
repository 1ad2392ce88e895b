use serde::{Deserialize, Serialize};

/// Chart periods offered by the form, serialized as their MQL5 `ENUM_TIMEFRAMES` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "PERIOD_M1")]
    M1,
    #[serde(rename = "PERIOD_M5")]
    M5,
    #[serde(rename = "PERIOD_M15")]
    M15,
    #[serde(rename = "PERIOD_M30")]
    M30,
    #[serde(rename = "PERIOD_H1")]
    H1,
    #[serde(rename = "PERIOD_H4")]
    H4,
    #[serde(rename = "PERIOD_D1")]
    D1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// MQL5 token emitted into generated code.
    pub fn as_mql5(&self) -> &'static str {
        match self {
            Timeframe::M1 => "PERIOD_M1",
            Timeframe::M5 => "PERIOD_M5",
            Timeframe::M15 => "PERIOD_M15",
            Timeframe::M30 => "PERIOD_M30",
            Timeframe::H1 => "PERIOD_H1",
            Timeframe::H4 => "PERIOD_H4",
            Timeframe::D1 => "PERIOD_D1",
        }
    }

    /// Short label shown in the timeframe selector.
    pub fn label(&self) -> &'static str {
        self.as_mql5().trim_start_matches("PERIOD_")
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mql5())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    /// Accepts either the full token (`PERIOD_H1`) or the label (`h1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let short = upper.trim_start_matches("PERIOD_");
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.label() == short)
            .ok_or_else(|| format!("Unknown timeframe: {}", s))
    }
}

/// Moving-average smoothing method (`ENUM_MA_METHOD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaMethod {
    #[serde(rename = "MODE_SMA")]
    Sma,
    #[serde(rename = "MODE_EMA")]
    Ema,
    #[serde(rename = "MODE_SMMA")]
    Smma,
    #[serde(rename = "MODE_LWMA")]
    Lwma,
}

impl MaMethod {
    pub const ALL: [MaMethod; 4] = [MaMethod::Sma, MaMethod::Ema, MaMethod::Smma, MaMethod::Lwma];

    pub fn as_mql5(&self) -> &'static str {
        match self {
            MaMethod::Sma => "MODE_SMA",
            MaMethod::Ema => "MODE_EMA",
            MaMethod::Smma => "MODE_SMMA",
            MaMethod::Lwma => "MODE_LWMA",
        }
    }

    pub fn label(&self) -> &'static str {
        self.as_mql5().trim_start_matches("MODE_")
    }
}

impl std::fmt::Display for MaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mql5())
    }
}

impl std::str::FromStr for MaMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let short = upper.trim_start_matches("MODE_");
        MaMethod::ALL
            .into_iter()
            .find(|m| m.label() == short)
            .ok_or_else(|| format!("Unknown MA method: {}", s))
    }
}

/// Price series an indicator is computed on (`ENUM_APPLIED_PRICE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppliedPrice {
    #[serde(rename = "PRICE_CLOSE")]
    Close,
    #[serde(rename = "PRICE_OPEN")]
    Open,
    #[serde(rename = "PRICE_HIGH")]
    High,
    #[serde(rename = "PRICE_LOW")]
    Low,
}

impl AppliedPrice {
    pub const ALL: [AppliedPrice; 4] = [
        AppliedPrice::Close,
        AppliedPrice::Open,
        AppliedPrice::High,
        AppliedPrice::Low,
    ];

    pub fn as_mql5(&self) -> &'static str {
        match self {
            AppliedPrice::Close => "PRICE_CLOSE",
            AppliedPrice::Open => "PRICE_OPEN",
            AppliedPrice::High => "PRICE_HIGH",
            AppliedPrice::Low => "PRICE_LOW",
        }
    }

    pub fn label(&self) -> &'static str {
        self.as_mql5().trim_start_matches("PRICE_")
    }
}

impl std::fmt::Display for AppliedPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mql5())
    }
}

impl std::str::FromStr for AppliedPrice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let short = upper.trim_start_matches("PRICE_");
        AppliedPrice::ALL
            .into_iter()
            .find(|p| p.label() == short)
            .ok_or_else(|| format!("Unknown applied price: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parses_token_and_label() {
        assert_eq!("PERIOD_H1".parse::<Timeframe>(), Ok(Timeframe::H1));
        assert_eq!("m15".parse::<Timeframe>(), Ok(Timeframe::M15));
        assert!("PERIOD_W1".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_timeframe_serde_uses_mql5_token() {
        let json = serde_json::to_string(&Timeframe::H4).unwrap();
        assert_eq!(json, "\"PERIOD_H4\"");
        let tf: Timeframe = serde_json::from_str("\"PERIOD_D1\"").unwrap();
        assert_eq!(tf, Timeframe::D1);
    }

    #[test]
    fn test_ma_method_and_price_tokens() {
        assert_eq!("ema".parse::<MaMethod>(), Ok(MaMethod::Ema));
        assert_eq!("MODE_LWMA".parse::<MaMethod>(), Ok(MaMethod::Lwma));
        assert_eq!("close".parse::<AppliedPrice>(), Ok(AppliedPrice::Close));
        assert_eq!(AppliedPrice::High.to_string(), "PRICE_HIGH");
        assert!("PRICE_MEDIAN".parse::<AppliedPrice>().is_err());
    }
}
