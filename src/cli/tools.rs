use super::ui;
use crate::core::calculator::{ToolGroup, ToolKind};
use comfy_table::Cell;

/// Lists every calculator, grouped the way the app menu shows them.
pub fn render() -> String {
    let mut output = String::new();
    for group in ToolGroup::ALL {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Command"),
            ui::header_cell("Tool"),
            ui::header_cell("Description"),
        ]);
        for kind in ToolKind::in_group(group) {
            let info = kind.info();
            table.add_row(vec![
                Cell::new(info.id),
                Cell::new(info.name),
                Cell::new(info.description),
            ]);
        }

        output.push_str(&format!(
            "{}\n{}\n\n",
            ui::style_text(&group.to_string(), ui::StyleType::Title),
            table
        ));
    }
    output.push_str(&ui::style_text(
        "Run `moneymaster calc <command> --help` to see the inputs of a tool.",
        ui::StyleType::Subtle,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_all_tools() {
        let output = render();
        for kind in ToolKind::ALL {
            assert!(output.contains(kind.info().id), "{}", kind.info().id);
        }
        assert!(output.contains("Daily Utility"));
    }
}
