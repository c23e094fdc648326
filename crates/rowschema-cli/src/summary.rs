use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rowschema_compile::ParseErrorKind;

use crate::types::ValidationRun;

pub fn print_summary(run: &ValidationRun) {
    println!("Dataset: {}", run.dataset);
    println!("Input: {}", run.input.display());
    if let Some(path) = &run.output {
        println!("Output: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records"),
        header_cell("Valid"),
        header_cell("Invalid"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(run.records).add_attribute(Attribute::Bold),
        count_cell(run.valid, Color::Green),
        count_cell(run.invalid, Color::Red),
    ]);
    println!("{table}");

    print_field_table(run);
    print_failure_table(run);
}

fn print_field_table(run: &ValidationRun) {
    let counts = run.ordered_error_counts();
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Error"),
        header_cell("Count"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (field, kind, count) in counts {
        table.add_row(vec![
            field_cell(field),
            kind_cell(kind),
            count_cell(count, Color::Red),
        ]);
    }
    println!();
    println!("Errors by field:");
    println!("{table}");
}

fn print_failure_table(run: &ValidationRun) {
    if run.failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Field"),
        header_cell("Error"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in &run.failures {
        for error in &failure.errors {
            table.add_row(vec![
                Cell::new(failure.record),
                field_cell(&error.field),
                kind_cell(error.kind),
                Cell::new(&error.message),
            ]);
        }
    }
    println!();
    if run.invalid > run.failures.len() {
        println!(
            "Rejected records (first {} of {}):",
            run.failures.len(),
            run.invalid
        );
    } else {
        println!("Rejected records:");
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn field_cell(field: &str) -> Cell {
    Cell::new(field)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn kind_cell(kind: ParseErrorKind) -> Cell {
    let color = match kind {
        ParseErrorKind::MissingValue | ParseErrorKind::UnrecognizedKey => Color::Yellow,
        ParseErrorKind::TypeMismatch
        | ParseErrorKind::InvalidDate
        | ParseErrorKind::UnmappedValue => Color::Red,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
