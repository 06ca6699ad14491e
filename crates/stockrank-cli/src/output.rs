//! Terminal rendering

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use stockrank_engine::AnalysisResult;

/// Leaderboard table, best first
pub fn leaderboard(result: &AnalysisResult) -> String {
    if result.is_empty() {
        return format!("No stored prices to rank ({})", result.date);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Rank",
        "Symbol",
        "Score",
        "Momentum",
        "Volatility",
        "Volume trend",
        "Close",
    ]);

    let right = |text: String| Cell::new(text).set_alignment(CellAlignment::Right);
    for s in &result.rankings {
        table.add_row(vec![
            right(s.rank.to_string()),
            Cell::new(&s.symbol),
            right(format!("{:.2}", s.score)),
            right(format!("{:+.2}%", s.momentum * 100.0)),
            right(format!("{:.4}", s.volatility)),
            right(format!("{:.2}x", s.volume_trend)),
            right(format!("{:.2}", s.latest_close)),
        ]);
    }

    format!("Rankings for {}\n{table}", result.date)
}
