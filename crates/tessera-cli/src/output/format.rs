use tessera_mcp::response::{FeedList, FeedMetadata, QueryResponse};
use tessera_storage::PublishReport;

use super::OutputFormat;

pub fn format_feed_list(list: &FeedList<'_>, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(list).unwrap_or_default(),
        OutputFormat::Text => format_feed_list_text(list),
    }
}

fn format_feed_list_text(list: &FeedList<'_>) -> String {
    if list.feeds.is_empty() {
        return "No feeds found.".to_string();
    }

    let mut out = String::new();
    for f in &list.feeds {
        out.push_str(&format!(
            "\u{25c6} {} [{}/{}] {} credits  {} records  {}\n",
            f.feed_id,
            f.category,
            f.query_pattern,
            f.query_cost_credits,
            f.record_count,
            f.provider
        ));
    }
    out.push_str(&format!("{} feed(s)", list.total_feeds));
    out
}

pub fn format_feed_metadata(meta: &FeedMetadata<'_>, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(meta).unwrap_or_default(),
        OutputFormat::Text => format_feed_metadata_text(meta),
    }
}

fn format_feed_metadata_text(meta: &FeedMetadata<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!("Feed:     {} ({})\n", meta.name, meta.feed_id));
    out.push_str(&format!(
        "Provider: {} ({}), reputation {:.2}\n",
        meta.provider.name, meta.provider.id, meta.provider.reputation_score
    ));
    out.push_str(&format!(
        "Category: {} / {}\n",
        meta.category, meta.query_pattern
    ));
    out.push_str(&format!("Cost:     {} credits per query\n", meta.query_cost_credits));
    out.push_str(&format!("Records:  {}\n", meta.record_count));
    out.push_str(&format!(
        "Updated:  {} ({})\n",
        meta.last_updated, meta.update_frequency
    ));
    out.push_str(&format!(
        "Storage:  {} on {}\n",
        meta.storage_hash, meta.storage_network
    ));
    if !meta.description.is_empty() {
        out.push_str(&format!("\n{}\n", meta.description));
    }

    if !meta.schema.fields.is_empty() {
        out.push_str("\n--- Schema ---\n");
        for field in &meta.schema.fields {
            out.push_str(&format!(
                "  {} ({}): {}\n",
                field.name, field.field_type, field.description
            ));
        }
    }

    if !meta.sample_queries.is_empty() {
        out.push_str("\n--- Sample Queries ---\n");
        for q in meta.sample_queries {
            out.push_str(&format!("  {q}\n"));
        }
    }

    out
}

pub fn format_query_response(response: &QueryResponse, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(response).unwrap_or_default(),
        OutputFormat::Text => format_query_response_text(response),
    }
}

fn format_query_response_text(response: &QueryResponse) -> String {
    let m = &response.query_metadata;
    let mut out = String::new();

    out.push_str(&format!("{}\n", response.explain));
    for record in &response.results {
        out.push_str(&format!(
            "  {}\n",
            serde_json::to_string(record).unwrap_or_default()
        ));
    }
    out.push_str(&format!(
        "Charged {} credits for {} ({} remaining). Source: {} on {}",
        m.query_cost, m.feed_id, m.credits_remaining, m.storage_hash, m.storage_network
    ));
    out
}

pub fn format_publish_report(report: &PublishReport, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            let published: Vec<_> = report
                .published
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "feed_id": p.feed_id,
                        "data_file": p.data_file,
                        "storage_hash": p.hash.as_str(),
                        "registry_up_to_date": !p.is_stale(),
                    })
                })
                .collect();
            let failed: Vec<_> = report
                .failed
                .iter()
                .map(|f| serde_json::json!({ "feed_id": f.feed_id, "error": f.error }))
                .collect();
            serde_json::to_string_pretty(&serde_json::json!({
                "published": published,
                "failed": failed,
            }))
            .unwrap_or_default()
        }
        OutputFormat::Text => format_publish_report_text(report),
    }
}

fn format_publish_report_text(report: &PublishReport) -> String {
    let mut out = String::new();
    for p in &report.published {
        let marker = if p.is_stale() {
            "  (registry storage_hash differs)"
        } else {
            ""
        };
        out.push_str(&format!("{}: {}{marker}\n", p.feed_id, p.hash));
    }
    for f in &report.failed {
        out.push_str(&format!("{}: FAILED ({})\n", f.feed_id, f.error));
    }
    out.push_str(&format!(
        "Published {} feed(s), {} failed",
        report.published.len(),
        report.failed.len()
    ));
    out
}
