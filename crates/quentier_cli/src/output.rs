//! Text and JSON rendering for CLI results.

use quentier_core::db::{ExpungeReport, StoragePatch, VersionStatus};
use quentier_core::models::Entity;
use quentier_model::{CellValue, Column, FavoritesItem, FavoritesModel};
use serde_json::{json, Value};

fn count_cell(value: Option<CellValue>) -> String {
    match value {
        Some(CellValue::Count(Some(count))) => count.to_string(),
        _ => String::new(),
    }
}

fn item_json(item: &FavoritesItem) -> Value {
    json!({
        "local_id": item.local_id,
        "kind": item.kind.as_str(),
        "name": item.display_name,
        "note_count": item.note_count,
    })
}

/// Favorites table in model order.
pub(crate) fn format_favorites(model: &FavoritesModel, json: bool) -> serde_json::Result<String> {
    if json {
        let items: Vec<Value> = model.items().map(item_json).collect();
        return serde_json::to_string_pretty(&items);
    }

    let mut lines = Vec::with_capacity(model.row_count() + 1);
    lines.push(format!(
        "{:<36} {:<13} {:<30} {:>10}",
        "Id",
        model.header_data(Column::Type),
        model.header_data(Column::DisplayName),
        model.header_data(Column::NoteCount)
    ));
    for (row, item) in model.items().enumerate() {
        lines.push(format!(
            "{:<36} {:<13} {:<30} {:>10}",
            item.local_id,
            item.kind.to_string(),
            item.display_name,
            count_cell(model.data(row, Column::NoteCount))
        ));
    }
    Ok(lines.join("\n"))
}

/// One entity after a create or flag change.
pub(crate) fn format_entity(action: &str, entity: &Entity, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(&json!({
            "local_id": entity.local_id(),
            "kind": entity.kind().as_str(),
            "name": entity.display_name(),
            "is_favorited": entity.is_favorited(),
        }));
    }
    Ok(format!(
        "{} {}: {} ({})",
        action,
        entity.kind().as_str(),
        entity.display_name(),
        entity.local_id()
    ))
}

pub(crate) fn format_expunge(report: &ExpungeReport, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(&json!({
            "kind": report.kind.as_str(),
            "local_id": report.local_id,
            "expunged_notes": report.expunged_notes,
            "expunged_tags": report.expunged_tags,
            "detached_notes": report.detached_notes,
        }));
    }
    let mut out = format!("Expunged {}: {}", report.kind.as_str(), report.local_id);
    if !report.expunged_notes.is_empty() {
        out.push_str(&format!("\n  with {} notes", report.expunged_notes.len()));
    }
    if !report.expunged_tags.is_empty() {
        out.push_str(&format!("\n  with {} child tags", report.expunged_tags.len()));
    }
    if !report.detached_notes.is_empty() {
        out.push_str(&format!(
            "\n  untagged {} notes",
            report.detached_notes.len()
        ));
    }
    Ok(out)
}

pub(crate) fn format_storage_status(
    status: &VersionStatus,
    patches: &[StoragePatch],
    applied: bool,
    json: bool,
) -> serde_json::Result<String> {
    if json {
        let patches: Vec<Value> = patches
            .iter()
            .map(|patch| {
                json!({
                    "from": patch.from_version(),
                    "to": patch.to_version(),
                    "description": patch.description(),
                })
            })
            .collect();
        return serde_json::to_string_pretty(&json!({
            "stored_version": status.stored,
            "supported_version": status.supported,
            "patches": patches,
            "applied": applied,
        }));
    }

    let mut lines = vec![format!(
        "Storage version {} (this build supports {})",
        status.stored, status.supported
    )];
    if patches.is_empty() {
        lines.push("No patches pending.".to_string());
    }
    for patch in patches {
        lines.push(format!(
            "{} patch {} -> {}: {}",
            if applied { "Applied" } else { "Pending" },
            patch.from_version(),
            patch.to_version(),
            patch.description()
        ));
    }
    Ok(lines.join("\n"))
}
