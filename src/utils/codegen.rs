use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::models::strategy::*;

// ══════════════════════════════════════════════════════════════
// Public API — types
// ══════════════════════════════════════════════════════════════

/// A single generated code file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeFile {
    pub filename: String,
    pub code: String,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Compose the MQL5 EA source for one parameter set.
///
/// Pure: the same inputs always produce the same text.
pub fn compose(common: &CommonParams, strategy: &StrategyParams) -> String {
    let mut out = String::with_capacity(6144);

    mql5_header(&mut out, common);
    mql5_inputs(&mut out, common);
    mql5_lot_size(&mut out, common);
    mql5_has_open_position(&mut out);

    match strategy {
        StrategyParams::MaCrossover(ma) => mql5_ma_crossover(&mut out, ma, common),
        StrategyParams::Rsi(rsi) => mql5_rsi(&mut out, rsi, common),
        StrategyParams::Macd(macd) => mql5_macd(&mut out, macd, common),
    }

    writeln!(out).ok();
    writeln!(out, "{}", BANNER).ok();
    out
}

/// Compose the EA and pair it with its download file name.
pub fn generate_mql5(common: &CommonParams, strategy: &StrategyParams) -> CodeFile {
    CodeFile {
        filename: output_filename(common),
        code: compose(common, strategy),
    }
}

/// `<ea_name>.mq5`, or the default stem when the name is empty.
pub fn output_filename(common: &CommonParams) -> String {
    let stem = if common.ea_name.is_empty() {
        DEFAULT_EA_NAME
    } else {
        common.ea_name.as_str()
    };
    format!("{}.mq5", stem)
}

/// Two fractional digits; NaN and infinities render as `0`.
///
/// Exact halfway values round away from zero (`0.125` → `0.13`). A double sits
/// exactly on a hundredths tie only when it is an odd multiple of 1/8.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    // -0.0 must not print a sign
    let value = if value == 0.0 { 0.0 } else { value };

    let eighths = value.abs() * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        // odd eighths are below 2^53, so the integer math is exact
        let hundredths = (eighths as u64 * 25 + 1) / 2;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
    }
    format!("{:.2}", value)
}

/// Backslash before every `"`. Newlines and other control characters pass through.
pub fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

// ══════════════════════════════════════════════════════════════
// Shared sections
// ══════════════════════════════════════════════════════════════

const BANNER: &str = "//+------------------------------------------------------------------+";

fn mql5_header(out: &mut String, common: &CommonParams) {
    writeln!(out, "{}", BANNER).ok();
    writeln!(out, "//| {}.mq5{:48}|", common.ea_name, "").ok();
    writeln!(out, "//| {:<66}|", "Generated by MT5 EA Builder").ok();
    writeln!(out, "//| Comment: {}{:37}|", common.comment, "").ok();
    writeln!(out, "{}", BANNER).ok();
    writeln!(out, "#property strict").ok();
    writeln!(out).ok();
}

fn mql5_inputs(out: &mut String, common: &CommonParams) {
    writeln!(out, "input string InpSymbol = \"{}\";", common.symbol).ok();
    writeln!(out, "input ENUM_TIMEFRAMES InpTimeframe = {};", common.timeframe.as_mql5()).ok();

    if common.use_risk_percent {
        writeln!(out, "input double InpRiskPercent = {};", format_decimal(common.risk_percent)).ok();
    } else {
        writeln!(out, "input double InpLotSize = {};", format_decimal(common.lot_size)).ok();
    }

    writeln!(out, "input int InpSL = {}; // points", common.stop_loss_points).ok();
    writeln!(out, "input int InpTP = {}; // points", common.take_profit_points).ok();
    writeln!(out, "input long InpMagic = {};", common.magic_number).ok();
    writeln!(out).ok();
    writeln!(out, "double PointValue;").ok();
    writeln!(out).ok();
}

fn mql5_lot_size(out: &mut String, common: &CommonParams) {
    writeln!(out, "double CalculateLot(double slPoints) {{").ok();

    if common.use_risk_percent {
        writeln!(out, "  double balance = AccountInfoDouble(ACCOUNT_BALANCE);").ok();
        writeln!(out, "  double riskMoney = balance * (InpRiskPercent/100.0);").ok();
        writeln!(out, "  double tickValue = SymbolInfoDouble(InpSymbol, SYMBOL_TRADE_TICK_VALUE);").ok();
        writeln!(out, "  double tickSize  = SymbolInfoDouble(InpSymbol, SYMBOL_TRADE_TICK_SIZE);").ok();
        writeln!(out, "  if(tickValue<=0 || tickSize<=0 || slPoints<=0) return 0.01;").ok();
        writeln!(out, "  double moneyPerLotAtSL = (slPoints * (PointValue/tickSize)) * tickValue;").ok();
        writeln!(out, "  double lots = riskMoney / MathMax(moneyPerLotAtSL, 0.00001);").ok();
        writeln!(out, "  double minLot = SymbolInfoDouble(InpSymbol, SYMBOL_VOLUME_MIN);").ok();
        writeln!(out, "  double maxLot = SymbolInfoDouble(InpSymbol, SYMBOL_VOLUME_MAX);").ok();
        writeln!(out, "  double step   = SymbolInfoDouble(InpSymbol, SYMBOL_VOLUME_STEP);").ok();
        writeln!(out, "  lots = MathMax(minLot, MathMin(maxLot, MathFloor(lots/step)*step));").ok();
        writeln!(out, "  return lots;").ok();
    } else {
        writeln!(out, "  return InpLotSize;").ok();
    }

    writeln!(out, "}}").ok();
    writeln!(out).ok();
}

fn mql5_has_open_position(out: &mut String) {
    writeln!(out, "bool HasOpenPosition(int type) {{").ok();
    writeln!(out, "  for(int i=PositionsTotal()-1; i>=0; --i) {{").ok();
    writeln!(out, "    ulong ticket = PositionGetTicket(i);").ok();
    writeln!(out, "    if(PositionSelectByTicket(ticket)) {{").ok();
    writeln!(out, "      if(PositionGetInteger(POSITION_MAGIC)==InpMagic && PositionGetString(POSITION_SYMBOL)==InpSymbol) {{").ok();
    writeln!(out, "        if((int)PositionGetInteger(POSITION_TYPE)==type) return true;").ok();
    writeln!(out, "      }}").ok();
    writeln!(out, "    }}").ok();
    writeln!(out, "  }}").ok();
    writeln!(out, "  return false;").ok();
    writeln!(out, "}}").ok();
}

fn mql5_on_init_open(out: &mut String) {
    writeln!(out, "int OnInit(){{").ok();
    writeln!(out, "  PointValue = SymbolInfoDouble(InpSymbol, SYMBOL_POINT);").ok();
}

fn mql5_on_init_close(out: &mut String, handles: &[&str]) {
    let cond = handles
        .iter()
        .map(|h| format!("{}==INVALID_HANDLE", h))
        .collect::<Vec<_>>()
        .join(" || ");
    writeln!(out, "  if({}) return(INIT_FAILED);", cond).ok();
    writeln!(out, "  return(INIT_SUCCEEDED);").ok();
    writeln!(out, "}}").ok();
    writeln!(out).ok();
}

fn mql5_on_tick_open(out: &mut String) {
    writeln!(out, "void OnTick(){{").ok();
    writeln!(out, "  if(_Symbol!=InpSymbol || _Period!=(int)InpTimeframe) return;").ok();
}

/// Market buy/sell requests gated on the two signal booleans, then closes `OnTick`.
/// `spaced` surrounds the request setup with blank lines.
fn mql5_trade_requests(
    out: &mut String,
    buy_signal: &str,
    sell_signal: &str,
    common: &CommonParams,
    spaced: bool,
) {
    let comment = escape_quotes(&common.comment);

    if spaced {
        writeln!(out).ok();
    }
    writeln!(out, "  MqlTradeRequest req; MqlTradeResult res; ZeroMemory(req); ZeroMemory(res);").ok();
    writeln!(out, "  req.symbol = InpSymbol; req.magic = InpMagic; req.deviation=20; req.type_filling=ORDER_FILLING_FOK;").ok();
    if spaced {
        writeln!(out).ok();
    }

    for (signal, position_type, order_type, price, sl_op, tp_op) in [
        (buy_signal, "POSITION_TYPE_BUY", "ORDER_TYPE_BUY", "SYMBOL_ASK", '-', '+'),
        (sell_signal, "POSITION_TYPE_SELL", "ORDER_TYPE_SELL", "SYMBOL_BID", '+', '-'),
    ] {
        writeln!(out, "  if({} && !HasOpenPosition({})) {{", signal, position_type).ok();
        writeln!(out, "    req.action = TRADE_ACTION_DEAL; req.type = {};", order_type).ok();
        writeln!(out, "    req.volume = CalculateLot(InpSL);").ok();
        writeln!(out, "    req.price  = SymbolInfoDouble(InpSymbol, {});", price).ok();
        writeln!(out, "    req.sl     = req.price {} InpSL*PointValue;", sl_op).ok();
        writeln!(out, "    req.tp     = req.price {} InpTP*PointValue;", tp_op).ok();
        writeln!(out, "    req.comment = \"{}\";", comment).ok();
        writeln!(out, "    OrderSend(req, res);").ok();
        writeln!(out, "  }}").ok();
    }

    writeln!(out, "}}").ok();
}

// ══════════════════════════════════════════════════════════════
// Strategy blocks
// ══════════════════════════════════════════════════════════════

fn mql5_ma_crossover(out: &mut String, ma: &MaParams, common: &CommonParams) {
    writeln!(out, "// --- Moving average crossover").ok();
    writeln!(out, "int handleFast, handleSlow;").ok();
    writeln!(out, "double maFast[3], maSlow[3];").ok();
    writeln!(out).ok();

    mql5_on_init_open(out);
    writeln!(
        out,
        "  handleFast = iMA(InpSymbol, (int)InpTimeframe, {}, 0, {}, {});",
        ma.fast,
        ma.method.as_mql5(),
        ma.price.as_mql5()
    )
    .ok();
    writeln!(
        out,
        "  handleSlow = iMA(InpSymbol, (int)InpTimeframe, {}, 0, {}, {});",
        ma.slow,
        ma.method.as_mql5(),
        ma.price.as_mql5()
    )
    .ok();
    mql5_on_init_close(out, &["handleFast", "handleSlow"]);

    mql5_on_tick_open(out);
    writeln!(out, "  if(CopyBuffer(handleFast, 0, 0, 3, maFast)<3) return;").ok();
    writeln!(out, "  if(CopyBuffer(handleSlow, 0, 0, 3, maSlow)<3) return;").ok();
    writeln!(out, "  bool crossUp   = (maFast[1] < maSlow[1]) && (maFast[0] > maSlow[0]);").ok();
    writeln!(out, "  bool crossDown = (maFast[1] > maSlow[1]) && (maFast[0] < maSlow[0]);").ok();
    mql5_trade_requests(out, "crossUp", "crossDown", common, true);
}

fn mql5_rsi(out: &mut String, rsi: &RsiParams, common: &CommonParams) {
    writeln!(out, "// --- RSI").ok();
    writeln!(out, "int handleRSI; double rsi[2];").ok();
    writeln!(out).ok();

    mql5_on_init_open(out);
    writeln!(out, "  handleRSI = iRSI(InpSymbol, (int)InpTimeframe, {}, PRICE_CLOSE);", rsi.period).ok();
    mql5_on_init_close(out, &["handleRSI"]);

    mql5_on_tick_open(out);
    writeln!(out, "  if(CopyBuffer(handleRSI, 0, 0, 2, rsi)<2) return;").ok();
    writeln!(out, "  double val = rsi[0];").ok();
    writeln!(out, "  bool buySignal  = (val < {});", rsi.oversold).ok();
    writeln!(out, "  bool sellSignal = (val > {});", rsi.overbought).ok();
    mql5_trade_requests(out, "buySignal", "sellSignal", common, false);
}

fn mql5_macd(out: &mut String, macd: &MacdParams, common: &CommonParams) {
    writeln!(out, "// --- MACD").ok();
    writeln!(out, "int handleMACD; double macdMain[2], macdSignal[2];").ok();
    writeln!(out).ok();

    mql5_on_init_open(out);
    writeln!(
        out,
        "  handleMACD = iMACD(InpSymbol, (int)InpTimeframe, {}, {}, {}, PRICE_CLOSE);",
        macd.fast, macd.slow, macd.signal
    )
    .ok();
    mql5_on_init_close(out, &["handleMACD"]);

    mql5_on_tick_open(out);
    writeln!(out, "  if(CopyBuffer(handleMACD, 0, 0, 2, macdMain)<2) return; // MAIN").ok();
    writeln!(out, "  if(CopyBuffer(handleMACD, 1, 0, 2, macdSignal)<2) return; // SIGNAL").ok();
    writeln!(out, "  bool crossUp   = (macdMain[1] < macdSignal[1]) && (macdMain[0] > macdSignal[0]);").ok();
    writeln!(out, "  bool crossDown = (macdMain[1] > macdSignal[1]) && (macdMain[0] < macdSignal[0]);").ok();
    mql5_trade_requests(out, "crossUp", "crossDown", common, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{AppliedPrice, MaMethod};

    fn ma_strategy() -> StrategyParams {
        StrategyParams::MaCrossover(MaParams {
            fast: 9,
            slow: 21,
            method: MaMethod::Ema,
            price: AppliedPrice::Close,
        })
    }

    fn rsi_strategy() -> StrategyParams {
        StrategyParams::Rsi(RsiParams { period: 14, overbought: 70, oversold: 30 })
    }

    fn macd_strategy() -> StrategyParams {
        StrategyParams::Macd(MacdParams { fast: 12, slow: 26, signal: 9 })
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_compose_is_deterministic() {
        let common = CommonParams::default();
        for strategy in [ma_strategy(), rsi_strategy(), macd_strategy()] {
            assert_eq!(compose(&common, &strategy), compose(&common, &strategy));
        }
    }

    #[test]
    fn test_exactly_one_sizing_declaration() {
        let mut common = CommonParams::default();
        let code = compose(&common, &ma_strategy());
        assert_eq!(count(&code, "input double InpLotSize = "), 1);
        assert_eq!(count(&code, "input double InpRiskPercent = "), 0);
        assert!(code.contains("  return InpLotSize;\n"));

        common.use_risk_percent = true;
        let code = compose(&common, &ma_strategy());
        assert_eq!(count(&code, "input double InpLotSize = "), 0);
        assert_eq!(count(&code, "input double InpRiskPercent = "), 1);
        assert!(code.contains("MathFloor(lots/step)*step"));
        assert!(!code.contains("return InpLotSize;"));
    }

    #[test]
    fn test_exactly_one_strategy_block() {
        let common = CommonParams::default();
        let markers = ["// --- Moving average crossover", "// --- RSI", "// --- MACD"];
        for (i, strategy) in [ma_strategy(), rsi_strategy(), macd_strategy()].iter().enumerate() {
            let code = compose(&common, strategy);
            for (j, marker) in markers.iter().enumerate() {
                assert_eq!(count(&code, marker), usize::from(i == j), "{} in block {}", marker, i);
            }
            assert_eq!(count(&code, "int OnInit(){"), 1);
            assert_eq!(count(&code, "void OnTick(){"), 1);
        }
    }

    #[test]
    fn test_ma_crossover_scenario() {
        let common = CommonParams { lot_size: 0.10, ..CommonParams::default() };
        let code = compose(&common, &ma_strategy());
        assert!(code.contains("input double InpLotSize = 0.10;\n"));
        assert!(code.contains("handleFast = iMA(InpSymbol, (int)InpTimeframe, 9, 0, MODE_EMA, PRICE_CLOSE);"));
        assert!(code.contains("handleSlow = iMA(InpSymbol, (int)InpTimeframe, 21, 0, MODE_EMA, PRICE_CLOSE);"));
        assert!(code.contains("if(handleFast==INVALID_HANDLE || handleSlow==INVALID_HANDLE) return(INIT_FAILED);"));
        assert!(!code.contains("iRSI("));
        assert!(!code.contains("iMACD("));
    }

    #[test]
    fn test_rsi_scenario() {
        let common = CommonParams {
            use_risk_percent: true,
            risk_percent: 1.0,
            ..CommonParams::default()
        };
        let code = compose(&common, &rsi_strategy());
        assert!(code.contains("input double InpRiskPercent = 1.00;\n"));
        assert_eq!(count(&code, "iRSI("), 1);
        assert!(code.contains("handleRSI = iRSI(InpSymbol, (int)InpTimeframe, 14, PRICE_CLOSE);"));
        assert!(code.contains("bool buySignal  = (val < 30);"));
        assert!(code.contains("bool sellSignal = (val > 70);"));
        assert!(!code.contains("iMA("));
    }

    #[test]
    fn test_macd_block_reads_main_and_signal() {
        let code = compose(&CommonParams::default(), &macd_strategy());
        assert!(code.contains("iMACD(InpSymbol, (int)InpTimeframe, 12, 26, 9, PRICE_CLOSE)"));
        assert!(code.contains("CopyBuffer(handleMACD, 0, 0, 2, macdMain)"));
        assert!(code.contains("CopyBuffer(handleMACD, 1, 0, 2, macdSignal)"));
        assert!(code.contains("(macdMain[1] < macdSignal[1]) && (macdMain[0] > macdSignal[0])"));
    }

    #[test]
    fn test_buy_and_sell_stops_are_mirrored() {
        let code = compose(&CommonParams::default(), &ma_strategy());
        let buy = code.find("req.type = ORDER_TYPE_BUY;").unwrap();
        let sell = code.find("req.type = ORDER_TYPE_SELL;").unwrap();
        assert!(buy < sell);
        let (buy_part, sell_part) = code.split_at(sell);
        assert!(buy_part[buy..].contains("req.sl     = req.price - InpSL*PointValue;"));
        assert!(buy_part[buy..].contains("req.tp     = req.price + InpTP*PointValue;"));
        assert!(sell_part.contains("req.sl     = req.price + InpSL*PointValue;"));
        assert!(sell_part.contains("req.tp     = req.price - InpTP*PointValue;"));
    }

    #[test]
    fn test_comment_quotes_escaped_in_orders() {
        let common = CommonParams {
            comment: r#"my "best" EA"#.to_string(),
            ..CommonParams::default()
        };
        let code = compose(&common, &rsi_strategy());
        assert_eq!(count(&code, r#"req.comment = "my \"best\" EA";"#), 2);
        assert!(!code.contains(r#"req.comment = "my "best""#));
        // header keeps the literal text
        assert!(code.contains(&format!("//| Comment: my \"best\" EA{}|\n", " ".repeat(37))));
    }

    #[test]
    fn test_header_and_footer() {
        let code = compose(&CommonParams::default(), &ma_strategy());
        let header = format!(
            "{banner}\n//| EA_Gerado.mq5{pad}|\n//| Generated by MT5 EA Builder{gen}|\n",
            banner = BANNER,
            pad = " ".repeat(48),
            gen = " ".repeat(39),
        );
        assert!(code.starts_with(&header));
        assert!(code.contains("#property strict\n"));
        assert!(code.contains("input ENUM_TIMEFRAMES InpTimeframe = PERIOD_H1;\n"));
        assert!(code.contains("input long InpMagic = 123456;\n"));
    }

    #[test]
    fn test_every_strategy_ends_with_footer() {
        for use_risk_percent in [false, true] {
            let common = CommonParams { use_risk_percent, ..CommonParams::default() };
            for strategy in [ma_strategy(), rsi_strategy(), macd_strategy()] {
                let code = compose(&common, &strategy);
                assert!(code.ends_with(&format!("  }}\n}}\n\n{}\n", BANNER)), "{:?}", strategy.kind());
                assert_eq!(count(&code, BANNER), 3);
            }
        }
    }

    #[test]
    fn test_full_text_ma_crossover_fixed_lot() {
        let code = compose(&CommonParams::default(), &ma_strategy());
        assert_eq!(code, include_str!("testdata/ma_crossover_fixed_lot.mq5"));
    }

    #[test]
    fn test_full_text_rsi_risk_percent() {
        let common = CommonParams {
            symbol: "GBPUSD".to_string(),
            timeframe: crate::models::config::Timeframe::M15,
            use_risk_percent: true,
            risk_percent: 1.0,
            ea_name: "RsiBot".to_string(),
            comment: r#"say "hi""#.to_string(),
            ..CommonParams::default()
        };
        let code = compose(&common, &rsi_strategy());
        assert_eq!(code, include_str!("testdata/rsi_risk_percent.mq5"));
    }

    #[test]
    fn test_full_text_macd_fixed_lot() {
        let common = CommonParams {
            lot_size: 0.125,
            magic_number: 42,
            ..CommonParams::default()
        };
        let code = compose(&common, &macd_strategy());
        assert_eq!(code, include_str!("testdata/macd_fixed_lot.mq5"));
    }

    #[test]
    fn test_on_tick_guards_symbol_and_timeframe() {
        for strategy in [ma_strategy(), rsi_strategy(), macd_strategy()] {
            let code = compose(&CommonParams::default(), &strategy);
            assert!(code.contains(
                "void OnTick(){\n  if(_Symbol!=InpSymbol || _Period!=(int)InpTimeframe) return;\n"
            ));
        }
    }

    #[test]
    fn test_has_open_position_filters_magic_symbol_and_type() {
        let code = compose(&CommonParams::default(), &rsi_strategy());
        let body = "bool HasOpenPosition(int type) {\n\
            \x20 for(int i=PositionsTotal()-1; i>=0; --i) {\n\
            \x20   ulong ticket = PositionGetTicket(i);\n\
            \x20   if(PositionSelectByTicket(ticket)) {\n\
            \x20     if(PositionGetInteger(POSITION_MAGIC)==InpMagic && PositionGetString(POSITION_SYMBOL)==InpSymbol) {\n\
            \x20       if((int)PositionGetInteger(POSITION_TYPE)==type) return true;\n\
            \x20     }\n\
            \x20   }\n\
            \x20 }\n\
            \x20 return false;\n\
            }\n";
        assert_eq!(count(&code, body), 1);
        assert_eq!(count(&code, "!HasOpenPosition(POSITION_TYPE_BUY)"), 1);
        assert_eq!(count(&code, "!HasOpenPosition(POSITION_TYPE_SELL)"), 1);
    }

    #[test]
    fn test_risk_sizing_fallback_and_clamp() {
        let common = CommonParams { use_risk_percent: true, ..CommonParams::default() };
        let code = compose(&common, &macd_strategy());
        assert!(code.contains("  if(tickValue<=0 || tickSize<=0 || slPoints<=0) return 0.01;\n"));
        assert!(code.contains("  double lots = riskMoney / MathMax(moneyPerLotAtSL, 0.00001);\n"));
        assert!(code.contains("  lots = MathMax(minLot, MathMin(maxLot, MathFloor(lots/step)*step));\n  return lots;\n}\n"));
        let fallback = code.find("return 0.01;").unwrap();
        let clamp = code.find("lots = MathMax(minLot").unwrap();
        assert!(fallback < clamp);
    }

    #[test]
    fn test_single_handle_strategies_fail_init_on_invalid_handle() {
        let rsi = compose(&CommonParams::default(), &rsi_strategy());
        assert!(rsi.contains("  if(handleRSI==INVALID_HANDLE) return(INIT_FAILED);\n  return(INIT_SUCCEEDED);\n"));
        let macd = compose(&CommonParams::default(), &macd_strategy());
        assert!(macd.contains("  if(handleMACD==INVALID_HANDLE) return(INIT_FAILED);\n  return(INIT_SUCCEEDED);\n"));
    }

    #[test]
    fn test_output_filename_fallback() {
        let mut common = CommonParams::default();
        common.ea_name = "MyEA".to_string();
        assert_eq!(output_filename(&common), "MyEA.mq5");
        common.ea_name.clear();
        assert_eq!(output_filename(&common), "EA_Gerado.mq5");

        let file = generate_mql5(&common, &ma_strategy());
        assert_eq!(file.filename, "EA_Gerado.mq5");
        assert_eq!(file.code, compose(&common, &ma_strategy()));
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.1), "0.10");
        assert_eq!(format_decimal(1.0), "1.00");
        assert_eq!(format_decimal(2.345678), "2.35");
        assert_eq!(format_decimal(-0.0), "0.00");
        assert_eq!(format_decimal(f64::NAN), "0");
        assert_eq!(format_decimal(f64::INFINITY), "0");
    }

    #[test]
    fn test_format_decimal_ties_round_away_from_zero() {
        assert_eq!(format_decimal(0.125), "0.13");
        assert_eq!(format_decimal(0.375), "0.38");
        assert_eq!(format_decimal(0.625), "0.63");
        assert_eq!(format_decimal(-0.125), "-0.13");
        assert_eq!(format_decimal(2.5), "2.50");
        // 1.005 is stored just below the tie
        assert_eq!(format_decimal(1.005), "1.00");
    }

    #[test]
    fn test_permissive_values_pass_through() {
        let strategy = StrategyParams::MaCrossover(MaParams {
            fast: 50,
            slow: 10,
            method: MaMethod::Sma,
            price: AppliedPrice::Low,
        });
        let common = CommonParams { stop_loss_points: -5, ..CommonParams::default() };
        let code = compose(&common, &strategy);
        assert!(code.contains("iMA(InpSymbol, (int)InpTimeframe, 50, 0, MODE_SMA, PRICE_LOW)"));
        assert!(code.contains("input int InpSL = -5; // points"));
    }
}
