use anyhow::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;
use streams_core::host::{Alert, AlertSeverity};
use streams_core::sort::SortDirection;
use streams_core::table::{
    provider_display_name, region_display_name, status_label, ExpiryCell, InstanceRow,
    ListView, RowView, TableView,
};
use streams_models::Instance;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_list_view(view: &ListView) {
    match view {
        ListView::Unauthorized => {
            println!("You do not have access to streaming instances.");
            println!("Ask your organization administrator for access.");
        }
        ListView::Empty => {
            println!("No instances found.");
            println!(
                "\nCreate one with: streams-console create --name <name> --provider aws --region us-east-1"
            );
        }
        ListView::Table(table) => print_table(table),
    }
}

fn print_table(view: &TableView) {
    let header: Vec<String> = view
        .columns
        .iter()
        .enumerate()
        .map(|(index, title)| {
            if index == view.sort_index {
                let arrow = match view.sort_direction {
                    SortDirection::Asc => "▲",
                    SortDirection::Desc => "▼",
                };
                format!("{} {}", title.to_uppercase(), arrow)
            } else {
                title.to_uppercase()
            }
        })
        .collect();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);

    for row in &view.rows {
        match row {
            RowView::Skeleton => {
                table.add_row(vec!["…"; view.columns.len()]);
            }
            RowView::Instance(row) => {
                table.add_row(instance_cells(row));
            }
        }
    }

    println!("{table}");

    if view.no_results {
        println!("No results found. Adjust your filters and try again.");
    }

    if let Some((first, last)) = page_range(view.page, view.per_page, view.total) {
        println!("{} - {} of {} (page {})", first, last, view.total, view.page);
    }
}

/// One-based positions of the first and last item on `page`, if it has any.
fn page_range(page: u32, per_page: u32, total: u32) -> Option<(u32, u32)> {
    let first = page
        .saturating_sub(1)
        .saturating_mul(per_page)
        .saturating_add(1);
    if total == 0 || per_page == 0 || first > total {
        return None;
    }
    let last = first.saturating_add(per_page - 1).min(total);
    Some((first, last))
}

fn instance_cells(row: &InstanceRow) -> Vec<String> {
    let mut name = row.name.clone();
    if row.selected {
        name = format!("> {}", name);
    }

    let mut created = row.created.clone();
    match &row.expires {
        Some(ExpiryCell::ExpiresIn(left)) => created.push_str(&format!("\nExpires in {}", left)),
        Some(ExpiryCell::Expired) => created.push_str("\nTrial expired"),
        Some(ExpiryCell::Pending) => created.push_str("\nExpires in …"),
        None => {}
    }

    vec![
        name,
        row.cloud_provider.clone(),
        row.region.clone(),
        row.owner.clone(),
        row.status.clone(),
        created,
    ]
}

pub fn print_alert(alert: &Alert) {
    let prefix = match alert.severity {
        AlertSeverity::Success => "✓",
        AlertSeverity::Info => "i",
        AlertSeverity::Warning => "!",
        AlertSeverity::Danger => "✗",
    };

    let line = match &alert.description {
        Some(description) => format!("{} {}: {}", prefix, alert.title, description),
        None => format!("{} {}", prefix, alert.title),
    };

    if alert.severity == AlertSeverity::Danger {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

pub fn print_instance_details(instance: &Instance) {
    println!("Instance: {}", instance.name);
    println!("  ID:         {}", instance.id.as_deref().unwrap_or("N/A"));
    println!("  Status:     {}", status_label(instance.status));
    println!("  Owner:      {}", instance.owner);
    println!(
        "  Provider:   {}",
        instance
            .cloud_provider
            .as_deref()
            .map(provider_display_name)
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!(
        "  Region:     {}",
        instance
            .region
            .as_deref()
            .map(region_display_name)
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!(
        "  Type:       {}",
        instance
            .instance_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("  Created:    {}", instance.created_at.to_rfc3339());
    println!("  Updated:    {}", instance.updated_at.to_rfc3339());
}

pub fn print_connection(instance: &Instance) {
    println!("Connection information for {}:", instance.name);
    match &instance.bootstrap_server_host {
        Some(host) => println!("  Bootstrap server: {}", host),
        None => println!("  Bootstrap server is not available until the instance is ready."),
    }
}
