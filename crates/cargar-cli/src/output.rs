//! Run summary rendering.

use cargar::RunSummary;

/// Render a run summary as a human-readable report.
pub fn render_run_report(host: &str, summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("LOAD RUN: {host}\n"));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    out.push_str(&format!(
        "Duration: {:.1}s │ Sessions: {} │ Requests: {} │ Failed: {} ({:.2}%)\n",
        summary.elapsed_secs,
        summary.concurrency,
        summary.total_requests,
        summary.failed_requests,
        summary.error_rate()
    ));
    out.push_str(&format!(
        "Throughput: {:.1} req/s\n\n",
        summary.throughput_rps
    ));

    out.push_str("Request Statistics:\n");
    out.push_str(
        "┌───────────────────────────┬─────────┬─────────┬─────────┬─────────┬─────────┐\n",
    );
    out.push_str(
        "│ Endpoint                  │ Count   │ Avg     │ p50     │ p95     │ Errors  │\n",
    );
    out.push_str(
        "├───────────────────────────┼─────────┼─────────┼─────────┼─────────┼─────────┤\n",
    );
    for stat in &summary.endpoints {
        out.push_str(&format!(
            "│ {:<25} │ {:>7} │ {:>5}ms │ {:>5}ms │ {:>5}ms │ {:>7} │\n",
            truncate(&stat.name, 25),
            stat.count,
            stat.avg_ms,
            stat.p50_ms,
            stat.p95_ms,
            stat.errors
        ));
    }
    out.push_str(
        "└───────────────────────────┴─────────┴─────────┴─────────┴─────────┴─────────┘\n",
    );

    out
}

/// Truncate a name to fit the table column.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 1).collect();
        format!("{cut}…")
    }
}
