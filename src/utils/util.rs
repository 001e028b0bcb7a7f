use std::fmt::Display;

use comfy_table::Cell;

use crate::buffer::{Buffer, SlotState};

/// One row per live element: logical index, physical slot, value.
pub fn pretty_format_buffer<T: Display>(buffer: &Buffer<T>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.load_preset("||--+-++|    ++++++");

    if buffer.is_empty() {
        return table;
    }

    table.set_header(vec![Cell::new("index"), Cell::new("slot"), Cell::new("value")]);
    let mut cursor = buffer.begin();
    for (index, value) in buffer.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index),
            Cell::new(cursor.post_inc().position()),
            Cell::new(format!("{value}")),
        ]);
    }

    table
}

/// One column per physical slot; vacant slots are shown as `*`.
pub fn pretty_format_layout<T: Display>(buffer: &Buffer<T>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.load_preset("||--+-++|    ++++++");

    let layout = buffer.layout();
    table.set_header((0..layout.len()).map(Cell::new).collect::<Vec<_>>());
    let row = layout
        .iter()
        .map(|state| match state {
            SlotState::Vacant => Cell::new("*"),
            SlotState::Occupied { logical } => Cell::new(format!("{}", buffer[*logical])),
        })
        .collect::<Vec<_>>();
    table.add_row(row);

    table
}

/// Logical contents on one line, space separated.
pub fn format_line<T: Display>(buffer: &Buffer<T>) -> String {
    buffer
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
