//! Text rendering of the ticket grid view model.

use owo_colors::OwoColorize;

use super::{format_count, format_money};
use crate::grid::{CellTone, GridViewModel, PurchaseModalViewModel, TicketCell};

/// Render one cell. Every cell is `label width + 2` columns wide.
///
/// `[07]` selected, ` -- ` sold, ` 77*` palindrome, ` 07 ` anything else.
fn render_cell(cell: &TicketCell, color: bool) -> String {
    let text = match cell.tone {
        CellTone::Selected => format!("[{}]", cell.label),
        CellTone::Sold => format!(" {} ", "-".repeat(cell.label.len())),
        CellTone::Palindrome => format!(" {}*", cell.label),
        CellTone::Disabled | CellTone::Available => format!(" {} ", cell.label),
    };
    if !color {
        return text;
    }
    match cell.tone {
        CellTone::Selected => text.green().bold().to_string(),
        CellTone::Sold => text.red().dimmed().to_string(),
        CellTone::Palindrome => text.yellow().to_string(),
        CellTone::Disabled => text.dimmed().to_string(),
        CellTone::Available => text,
    }
}

/// Render the visible grid page with its header and summary lines.
pub fn render_grid(vm: &GridViewModel, color: bool) -> String {
    let mut lines = Vec::with_capacity(vm.rows + 4);

    let mut header = vec![
        format!(
            "Showing {}-{} of {}",
            format_count(vm.summary.first_shown),
            format_count(vm.summary.last_shown),
            format_count(vm.summary.ticket_count),
        ),
        format!("zoom {} ({}x{})", vm.zoom, vm.rows, vm.cols),
    ];
    if vm.can_page_backward {
        header.push("< prev".to_string());
    }
    if vm.can_page_forward {
        header.push("next >".to_string());
    }
    lines.push(header.join(" | "));

    for row in vm.rows() {
        let cells: Vec<String> = row.iter().map(|c| render_cell(c, color)).collect();
        lines.push(cells.join(" ").trim_end().to_string());
    }

    let mut summary = format!(
        "Available {} | Sold {} | Selected {}",
        format_count(vm.summary.available),
        format_count(vm.summary.sold),
        vm.summary.selected,
    );
    if vm.summary.selected > 0 {
        summary.push_str(&format!(" ({})", format_money(vm.summary.selected_total)));
    }
    lines.push(summary);

    if let Some(notice) = vm.status_notice {
        lines.push(if color {
            notice.yellow().to_string()
        } else {
            notice.to_string()
        });
    }

    lines.join("\n")
}

/// Render the purchase confirmation box.
pub fn render_purchase_modal(modal: &PurchaseModalViewModel, color: bool) -> String {
    let mut lines = vec![
        "Confirm purchase".to_string(),
        format!("  Tickets:    {}", modal.labels.join(", ")),
        format!("  Unit price: {}", format_money(modal.unit_price)),
        format!("  Total:      {}", format_money(modal.total)),
    ];
    if modal.in_flight {
        lines.push("  Submitting...".to_string());
    }
    if let Some(error) = &modal.error {
        let line = format!("  Purchase failed: {error}");
        lines.push(if color { line.red().to_string() } else { line });
    }
    lines.join("\n")
}
