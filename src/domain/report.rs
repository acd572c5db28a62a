//! Daily summary message formatting.
//!
//! The delivery mechanism is a collaborator behind `NotifyPort`; this module
//! only owns the content: a dated header, a BUY section, and an EXIT
//! section, each with an explicit "None" marker when empty.

use crate::domain::engine::DailyReport;

pub fn format_daily_message(report: &DailyReport) -> String {
    let mut msg = format!("📅 *Swing Trading Signals — {}*\n\n", report.as_of);

    if report.entries.is_empty() {
        msg.push_str("🟢 BUY: None\n");
    } else {
        msg.push_str("🟢 *BUY Signals:*\n");
        for p in &report.entries {
            msg.push_str(&format!(
                "• {} @ {:.2}  (SL: {:.2}  Target: {:.2})\n",
                p.stock, p.buy, p.stop_loss, p.target
            ));
        }
    }

    msg.push('\n');

    if report.exits.is_empty() {
        msg.push_str("🔵 EXIT: None\n");
    } else {
        msg.push_str("🔵 *EXIT Signals:*\n");
        for e in &report.exits {
            msg.push_str(&format!(
                "• {} — {} @ {:.2}\n",
                e.stock, e.reason, e.exit_price
            ));
        }
    }

    msg
}
